use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::password_reset_repository::PasswordResetRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::otp::{self, OtpPolicy, OtpVerdict};
use crate::application::services::passwords::hash_password;
use crate::application::services::tokens::{FlowPurpose, TokenIssuer};
use crate::application::services::validation;

pub struct ResetPassword<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: PasswordResetRepository + ?Sized,
{
    pub users: &'a U,
    pub resets: &'a R,
    pub tokens: &'a TokenIssuer,
    pub policy: OtpPolicy,
}

impl<'a, U, R> ResetPassword<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: PasswordResetRepository + ?Sized,
{
    pub async fn execute(
        &self,
        reset_token: &str,
        code: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let email = self
            .tokens
            .verify_flow(reset_token, FlowPurpose::PasswordReset)?;
        validation::validate_password(new_password)?;

        // Unknown account and missing challenge look the same to the caller.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::NotFound("reset request"))?;
        let pending = self
            .resets
            .find(user.id)
            .await?
            .ok_or(ServiceError::NotFound("reset request"))?;

        match otp::evaluate(
            &pending.otp,
            code,
            chrono::Utc::now(),
            self.policy.max_attempts,
        ) {
            OtpVerdict::Valid => {}
            OtpVerdict::Exhausted => {
                return Err(ServiceError::TooManyRequests(
                    "too many attempts, request a new code".into(),
                ));
            }
            OtpVerdict::Expired => {
                return Err(ServiceError::Gone("reset code expired".into()));
            }
            OtpVerdict::Mismatch => {
                let attempts = self.resets.record_failed_attempt(user.id).await?;
                tracing::warn!(user_id = %user.id, attempts, "reset_otp_mismatch");
                return Err(ServiceError::validation("invalid otp"));
            }
        }

        let hash = hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;
        self.resets.delete(user.id).await?;
        tracing::info!(user_id = %user.id, "password_reset_completed");
        Ok(())
    }
}
