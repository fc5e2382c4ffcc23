use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::{User, UserStatus};

pub struct SetUserStatus<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> SetUserStatus<'a, R> {
    pub async fn execute(&self, user_id: Uuid, status: UserStatus) -> ServiceResult<User> {
        let user = self
            .repo
            .set_status(user_id, status)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;
        tracing::info!(user_id = %user_id, status = status.as_str(), "user_status_changed");
        Ok(user)
    }
}
