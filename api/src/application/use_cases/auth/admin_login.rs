use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::admin_repository::AdminRepository;
use crate::application::services::passwords::verify_password;
use crate::application::services::tokens::{ROLE_ADMIN, TokenIssuer};
use crate::domain::users::user::Admin;

pub struct AdminLogin<'a, R: AdminRepository + ?Sized> {
    pub repo: &'a R,
    pub tokens: &'a TokenIssuer,
}

pub struct AdminSession {
    pub access_token: String,
    pub admin: Admin,
}

impl<'a, R: AdminRepository + ?Sized> AdminLogin<'a, R> {
    pub async fn execute(&self, email: &str, password: &str) -> ServiceResult<AdminSession> {
        let email = email.trim().to_lowercase();
        let (admin, hash) = self
            .repo
            .find_credentials(&email)
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        if !verify_password(password, &hash) {
            tracing::warn!(admin_id = %admin.id, "admin_login_failed");
            return Err(ServiceError::Unauthorized);
        }
        let access_token = self.tokens.issue_access(admin.id, ROLE_ADMIN)?;
        Ok(AdminSession {
            access_token,
            admin,
        })
    }
}
