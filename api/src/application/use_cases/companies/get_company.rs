use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::company_repository::CompanyRepository;
use crate::domain::companies::company::Company;

pub struct GetCompany<'a, R: CompanyRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CompanyRepository + ?Sized> GetCompany<'a, R> {
    /// Other users' companies are reported as missing.
    pub async fn execute(&self, owner_id: Uuid, id: Uuid) -> ServiceResult<Company> {
        match self.repo.get(id).await? {
            Some(company) if company.owner_id == owner_id => Ok(company),
            _ => Err(ServiceError::NotFound("company")),
        }
    }
}
