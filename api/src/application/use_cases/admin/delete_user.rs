use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;

pub struct DeleteUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteUser<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<()> {
        if !self.repo.soft_delete(user_id).await? {
            return Err(ServiceError::NotFound("user"));
        }
        tracing::info!(user_id = %user_id, "user_deleted");
        Ok(())
    }
}
