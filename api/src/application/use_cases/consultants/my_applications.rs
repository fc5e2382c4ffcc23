use uuid::Uuid;

use crate::application::error::ServiceResult;
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::domain::consultants::application::ConsultantApplication;

pub struct MyApplications<'a, R: ConsultantRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ConsultantRepository + ?Sized> MyApplications<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<Vec<ConsultantApplication>> {
        Ok(self.repo.list_for_user(user_id).await?)
    }
}
