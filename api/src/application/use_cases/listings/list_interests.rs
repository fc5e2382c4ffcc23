use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::ListingInterest;

pub struct ListInterests<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ListInterests<'a, R> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
    ) -> ServiceResult<Vec<ListingInterest>> {
        match self.repo.get(listing_id).await? {
            Some(listing) if listing.owner_id == owner_id => {}
            _ => return Err(ServiceError::NotFound("listing")),
        }
        Ok(self.repo.list_interests(listing_id).await?)
    }
}
