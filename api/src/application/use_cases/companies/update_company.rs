use uuid::Uuid;

use super::CompanyInput;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::company_repository::CompanyRepository;
use crate::domain::companies::company::Company;

pub struct UpdateCompany<'a, R: CompanyRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CompanyRepository + ?Sized> UpdateCompany<'a, R> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: CompanyInput,
    ) -> ServiceResult<Company> {
        let draft = input.into_draft()?;
        self.repo
            .update_for_owner(id, owner_id, &draft)
            .await?
            .ok_or(ServiceError::NotFound("company"))
    }
}
