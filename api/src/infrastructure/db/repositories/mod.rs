pub mod admin_repository_sqlx;
pub mod company_repository_sqlx;
pub mod consultant_repository_sqlx;
pub mod document_repository_sqlx;
pub mod listing_repository_sqlx;
pub mod otp_repositories_sqlx;
pub mod stats_repository_sqlx;
pub mod subscription_repository_sqlx;
pub mod user_repository_sqlx;
