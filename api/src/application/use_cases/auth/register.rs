use crate::application::dto::auth::OtpChallenge;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::mail_sender::MailSender;
use crate::application::ports::pending_registration_repository::{
    PendingRegistration, PendingRegistrationRepository,
};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::otp::{self, OtpPolicy, OtpState};
use crate::application::services::passwords::hash_password;
use crate::application::services::tokens::{FlowPurpose, TokenIssuer};
use crate::application::services::validation;

/// Stages a registration and mails its OTP.
pub struct Register<'a, U, P, M>
where
    U: UserRepository + ?Sized,
    P: PendingRegistrationRepository + ?Sized,
    M: MailSender + ?Sized,
{
    pub users: &'a U,
    pub pending: &'a P,
    pub mailer: &'a M,
    pub tokens: &'a TokenIssuer,
    pub policy: OtpPolicy,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

impl<'a, U, P, M> Register<'a, U, P, M>
where
    U: UserRepository + ?Sized,
    P: PendingRegistrationRepository + ?Sized,
    M: MailSender + ?Sized,
{
    pub async fn execute(&self, req: &RegisterRequest) -> ServiceResult<OtpChallenge> {
        let name = validation::required_text("name", &req.name, 120)?;
        let email = validation::normalize_email(&req.email)?;
        let phone = validation::normalize_phone(req.phone.as_deref())?;
        validation::validate_password(&req.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("email is already registered"));
        }

        let code = otp::generate_otp();
        let now = chrono::Utc::now();
        let expires_at = self.policy.expiry_from(now);
        let staged = PendingRegistration {
            email: email.clone(),
            name,
            phone,
            password_hash: hash_password(&req.password)?,
            otp: OtpState {
                otp_hash: otp::hash_otp(&code),
                expires_at,
                attempts: 0,
            },
            last_sent_at: now,
        };
        self.pending.upsert(&staged).await?;

        let mail = super::otp_mail(&email, "Verify your BizNest account", &code, self.policy.ttl_secs);
        self.mailer.send(&mail).await.map_err(|err| {
            tracing::error!(error = ?err, email = %email, "registration_otp_send_failed");
            err
        })?;

        let token = self.tokens.issue_flow(&email, FlowPurpose::Register)?;
        tracing::info!(email = %email, "registration_started");
        Ok(OtpChallenge {
            token,
            email,
            expires_at,
        })
    }
}
