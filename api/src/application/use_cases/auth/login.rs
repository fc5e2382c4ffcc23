use crate::application::dto::auth::AuthSession;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords::verify_password;
use crate::application::services::tokens::TokenIssuer;
use crate::application::services::validation;
use crate::domain::users::user::UserStatus;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub tokens: &'a TokenIssuer,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> ServiceResult<AuthSession> {
        let email = validation::normalize_email(&req.email).map_err(|_| ServiceError::Unauthorized)?;
        let (user, hash) = self
            .repo
            .find_credentials(&email)
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        if !verify_password(&req.password, &hash) {
            return Err(ServiceError::Unauthorized);
        }
        if user.status == UserStatus::Blocked {
            return Err(ServiceError::forbidden("account is blocked"));
        }
        let access_token = self.tokens.issue_access(user.id, user.role.as_str())?;
        Ok(AuthSession { access_token, user })
    }
}
