use crate::application::dto::pagination::{Page, PageRequest};
use crate::application::error::ServiceResult;
use crate::application::ports::user_repository::{UserFilter, UserRepository};
use crate::application::services::validation;
use crate::domain::users::user::User;

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(&self, filter: UserFilter, page: PageRequest) -> ServiceResult<Page<User>> {
        let filter = UserFilter {
            q: validation::optional_text(filter.q),
            ..filter
        };
        let (items, total) = self.repo.search(&filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}
