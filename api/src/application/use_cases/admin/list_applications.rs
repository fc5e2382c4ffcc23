use crate::application::dto::pagination::{Page, PageRequest};
use crate::application::error::ServiceResult;
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::domain::consultants::application::ConsultantApplication;
use crate::domain::moderation::ReviewStatus;

pub struct ListApplications<'a, R: ConsultantRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ConsultantRepository + ?Sized> ListApplications<'a, R> {
    pub async fn execute(
        &self,
        status: Option<ReviewStatus>,
        page: PageRequest,
    ) -> ServiceResult<Page<ConsultantApplication>> {
        let (items, total) = self.repo.list(status, page).await?;
        Ok(Page::new(items, total, page))
    }
}
