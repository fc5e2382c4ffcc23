use crate::application::dto::auth::AuthSession;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::pending_registration_repository::PendingRegistrationRepository;
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::services::otp::{self, OtpPolicy, OtpVerdict};
use crate::application::services::tokens::{FlowPurpose, TokenIssuer};

/// Confirms a staged registration with its OTP and creates the user.
pub struct VerifyRegistration<'a, U, P>
where
    U: UserRepository + ?Sized,
    P: PendingRegistrationRepository + ?Sized,
{
    pub users: &'a U,
    pub pending: &'a P,
    pub tokens: &'a TokenIssuer,
    pub policy: OtpPolicy,
}

impl<'a, U, P> VerifyRegistration<'a, U, P>
where
    U: UserRepository + ?Sized,
    P: PendingRegistrationRepository + ?Sized,
{
    pub async fn execute(&self, registration_token: &str, code: &str) -> ServiceResult<AuthSession> {
        let email = self
            .tokens
            .verify_flow(registration_token, FlowPurpose::Register)?;
        let staged = self
            .pending
            .find(&email)
            .await?
            .ok_or(ServiceError::NotFound("registration"))?;

        match otp::evaluate(
            &staged.otp,
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
                return Err(ServiceError::Gone("verification code expired".into()));
            }
            OtpVerdict::Mismatch => {
                let attempts = self.pending.record_failed_attempt(&email).await?;
                tracing::warn!(email = %email, attempts, "registration_otp_mismatch");
                return Err(ServiceError::validation("invalid otp"));
            }
        }

        // Someone may have registered the address through another flow meanwhile.
        if self.users.find_by_email(&email).await?.is_some() {
            self.pending.delete(&email).await?;
            return Err(ServiceError::conflict("email is already registered"));
        }

        let user = self
            .users
            .create_user(&NewUser {
                name: staged.name,
                email: staged.email,
                phone: staged.phone,
                password_hash: staged.password_hash,
            })
            .await?;
        self.pending.delete(&email).await?;

        let access_token = self.tokens.issue_access(user.id, user.role.as_str())?;
        tracing::info!(user_id = %user.id, "registration_completed");
        Ok(AuthSession { access_token, user })
    }
}
