pub mod admin;
pub mod auth;
pub mod companies;
pub mod consultants;
pub mod documents;
pub mod listings;
pub mod subscriptions;
