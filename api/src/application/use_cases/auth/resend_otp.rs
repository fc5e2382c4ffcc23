use crate::application::dto::auth::OtpChallenge;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::mail_sender::MailSender;
use crate::application::ports::pending_registration_repository::PendingRegistrationRepository;
use crate::application::services::otp::{self, OtpPolicy};
use crate::application::services::tokens::{FlowPurpose, TokenIssuer};

pub struct ResendOtp<'a, P, M>
where
    P: PendingRegistrationRepository + ?Sized,
    M: MailSender + ?Sized,
{
    pub pending: &'a P,
    pub mailer: &'a M,
    pub tokens: &'a TokenIssuer,
    pub policy: OtpPolicy,
}

impl<'a, P, M> ResendOtp<'a, P, M>
where
    P: PendingRegistrationRepository + ?Sized,
    M: MailSender + ?Sized,
{
    pub async fn execute(&self, registration_token: &str) -> ServiceResult<OtpChallenge> {
        let email = self
            .tokens
            .verify_flow(registration_token, FlowPurpose::Register)?;
        let staged = self
            .pending
            .find(&email)
            .await?
            .ok_or(ServiceError::NotFound("registration"))?;

        let now = chrono::Utc::now();
        let wait = staged.last_sent_at + chrono::Duration::seconds(self.policy.resend_cooldown_secs);
        if wait > now {
            let secs = (wait - now).num_seconds().max(1);
            return Err(ServiceError::TooManyRequests(format!(
                "please wait {secs} seconds before requesting a new code"
            )));
        }

        let code = otp::generate_otp();
        let expires_at = self.policy.expiry_from(now);
        self.pending
            .refresh_otp(&email, &otp::hash_otp(&code), expires_at, now)
            .await?;
        let mail = super::otp_mail(&email, "Your new BizNest code", &code, self.policy.ttl_secs);
        self.mailer.send(&mail).await?;

        // Fresh token so the client gets a full verification window.
        let token = self.tokens.issue_flow(&email, FlowPurpose::Register)?;
        Ok(OtpChallenge {
            token,
            email,
            expires_at,
        })
    }
}
