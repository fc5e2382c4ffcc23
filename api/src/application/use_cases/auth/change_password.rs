use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords::{hash_password, verify_password};
use crate::application::services::validation;

pub struct ChangePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ChangePassword<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let hash = self
            .repo
            .password_hash(user_id)
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        if !verify_password(current_password, &hash) {
            return Err(ServiceError::validation("current password is incorrect"));
        }
        validation::validate_password(new_password)?;
        let new_hash = hash_password(new_password)?;
        self.repo.update_password(user_id, &new_hash).await?;
        tracing::info!(user_id = %user_id, "password_changed");
        Ok(())
    }
}
