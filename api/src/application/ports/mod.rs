pub mod admin_repository;
pub mod company_repository;
pub mod consultant_repository;
pub mod document_repository;
pub mod listing_repository;
pub mod mail_sender;
pub mod password_reset_repository;
pub mod pending_registration_repository;
pub mod stats_repository;
pub mod storage_port;
pub mod subscription_repository;
pub mod user_repository;
