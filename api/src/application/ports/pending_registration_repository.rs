use async_trait::async_trait;

use crate::application::services::otp::OtpState;

/// A registration waiting for its OTP to be confirmed.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub otp: OtpState,
    pub last_sent_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait PendingRegistrationRepository: Send + Sync {
    /// Replaces any staged row for the same email.
    async fn upsert(&self, pending: &PendingRegistration) -> anyhow::Result<()>;
    async fn find(&self, email: &str) -> anyhow::Result<Option<PendingRegistration>>;
    async fn record_failed_attempt(&self, email: &str) -> anyhow::Result<i32>;
    /// Swaps in a fresh OTP and resets the attempt counter.
    async fn refresh_otp(
        &self,
        email: &str,
        otp_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
        sent_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<bool>;
    async fn delete(&self, email: &str) -> anyhow::Result<()>;
}
