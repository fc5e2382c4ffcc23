pub mod companies;
pub mod consultants;
pub mod documents;
pub mod listings;
pub mod moderation;
pub mod subscriptions;
pub mod users;
