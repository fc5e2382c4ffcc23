use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::validation;
use crate::domain::users::user::User;

pub struct UpdateProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateProfile<'a, R> {
    // phone: None => unchanged; Some("") => cleared
    pub async fn execute(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> ServiceResult<User> {
        let name = name
            .map(|n| validation::required_text("name", &n, 120))
            .transpose()?;
        let phone = match phone {
            Some(p) => Some(validation::normalize_phone(Some(&p))?),
            None => None,
        };
        self.repo
            .update_profile(user_id, name, phone)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }
}
