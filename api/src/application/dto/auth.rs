use crate::domain::users::user::User;

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user: User,
}

/// Handed back after an OTP was issued for a registration or password reset.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub token: String,
    pub email: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
