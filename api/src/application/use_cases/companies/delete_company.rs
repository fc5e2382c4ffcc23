use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::company_repository::CompanyRepository;

pub struct DeleteCompany<'a, R: CompanyRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CompanyRepository + ?Sized> DeleteCompany<'a, R> {
    pub async fn execute(&self, owner_id: Uuid, id: Uuid) -> ServiceResult<()> {
        if !self.repo.soft_delete_for_owner(id, owner_id).await? {
            return Err(ServiceError::NotFound("company"));
        }
        tracing::info!(company_id = %id, owner_id = %owner_id, "company_deleted");
        Ok(())
    }
}
