use crate::application::dto::auth::OtpChallenge;
use crate::application::error::ServiceResult;
use crate::application::ports::mail_sender::MailSender;
use crate::application::ports::password_reset_repository::{
    PasswordReset, PasswordResetRepository,
};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::otp::{self, OtpPolicy, OtpState};
use crate::application::services::tokens::{FlowPurpose, TokenIssuer};
use crate::application::services::validation;
use crate::domain::users::user::UserStatus;

/// Issues a reset challenge. The answer is the same whether or not the email
/// belongs to an account.
pub struct ForgotPassword<'a, U, R, M>
where
    U: UserRepository + ?Sized,
    R: PasswordResetRepository + ?Sized,
    M: MailSender + ?Sized,
{
    pub users: &'a U,
    pub resets: &'a R,
    pub mailer: &'a M,
    pub tokens: &'a TokenIssuer,
    pub policy: OtpPolicy,
}

impl<'a, U, R, M> ForgotPassword<'a, U, R, M>
where
    U: UserRepository + ?Sized,
    R: PasswordResetRepository + ?Sized,
    M: MailSender + ?Sized,
{
    pub async fn execute(&self, raw_email: &str) -> ServiceResult<OtpChallenge> {
        let email = validation::normalize_email(raw_email)?;
        let now = chrono::Utc::now();
        let expires_at = self.policy.expiry_from(now);

        match self.users.find_by_email(&email).await? {
            Some(user) if user.status == UserStatus::Active => {
                let code = otp::generate_otp();
                self.resets
                    .upsert(&PasswordReset {
                        user_id: user.id,
                        otp: OtpState {
                            otp_hash: otp::hash_otp(&code),
                            expires_at,
                            attempts: 0,
                        },
                    })
                    .await?;
                let mail =
                    super::otp_mail(&email, "Reset your BizNest password", &code, self.policy.ttl_secs);
                if let Err(err) = self.mailer.send(&mail).await {
                    tracing::error!(error = ?err, user_id = %user.id, "reset_otp_send_failed");
                    return Err(err.into());
                }
                tracing::info!(user_id = %user.id, "password_reset_requested");
            }
            _ => {
                tracing::debug!("password_reset_requested_for_unknown_or_blocked_account");
            }
        }

        let token = self.tokens.issue_flow(&email, FlowPurpose::PasswordReset)?;
        Ok(OtpChallenge {
            token,
            email,
            expires_at,
        })
    }
}
