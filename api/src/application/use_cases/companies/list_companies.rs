use uuid::Uuid;

use crate::application::error::ServiceResult;
use crate::application::ports::company_repository::CompanyRepository;
use crate::domain::companies::company::Company;

pub struct ListCompanies<'a, R: CompanyRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CompanyRepository + ?Sized> ListCompanies<'a, R> {
    pub async fn execute(&self, owner_id: Uuid) -> ServiceResult<Vec<Company>> {
        Ok(self.repo.list_for_owner(owner_id).await?)
    }
}
