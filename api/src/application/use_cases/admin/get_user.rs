use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct GetUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetUser<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }
}
