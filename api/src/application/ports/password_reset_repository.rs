use async_trait::async_trait;
use uuid::Uuid;

use crate::application::services::otp::OtpState;

#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub user_id: Uuid,
    pub otp: OtpState,
}

#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn upsert(&self, reset: &PasswordReset) -> anyhow::Result<()>;
    async fn find(&self, user_id: Uuid) -> anyhow::Result<Option<PasswordReset>>;
    async fn record_failed_attempt(&self, user_id: Uuid) -> anyhow::Result<i32>;
    async fn delete(&self, user_id: Uuid) -> anyhow::Result<()>;
}
