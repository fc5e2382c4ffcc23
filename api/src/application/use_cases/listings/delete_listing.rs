use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;

pub struct DeleteListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> DeleteListing<'a, R> {
    pub async fn execute(&self, owner_id: Uuid, id: Uuid) -> ServiceResult<()> {
        if !self.repo.soft_delete_for_owner(id, owner_id).await? {
            return Err(ServiceError::NotFound("listing"));
        }
        tracing::info!(listing_id = %id, owner_id = %owner_id, "listing_deleted");
        Ok(())
    }
}
