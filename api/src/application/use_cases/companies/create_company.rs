use uuid::Uuid;

use super::CompanyInput;
use crate::application::error::ServiceResult;
use crate::application::ports::company_repository::CompanyRepository;
use crate::domain::companies::company::Company;

pub struct CreateCompany<'a, R: CompanyRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CompanyRepository + ?Sized> CreateCompany<'a, R> {
    pub async fn execute(&self, owner_id: Uuid, input: CompanyInput) -> ServiceResult<Company> {
        let draft = input.into_draft()?;
        let company = self.repo.create(owner_id, &draft).await?;
        tracing::info!(company_id = %company.id, owner_id = %owner_id, "company_created");
        Ok(company)
    }
}
