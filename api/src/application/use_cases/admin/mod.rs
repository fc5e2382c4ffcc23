pub mod dashboard_stats;
pub mod delete_user;
pub mod get_user;
pub mod list_applications;
pub mod list_listings;
pub mod list_users;
pub mod moderate_listing;
pub mod review_application;
pub mod set_user_status;
