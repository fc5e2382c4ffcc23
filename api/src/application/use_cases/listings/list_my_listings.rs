use uuid::Uuid;

use crate::application::dto::pagination::{Page, PageRequest};
use crate::application::error::ServiceResult;
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::Listing;

pub struct ListMyListings<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ListMyListings<'a, R> {
    pub async fn execute(&self, owner_id: Uuid, page: PageRequest) -> ServiceResult<Page<Listing>> {
        let (items, total) = self.repo.list_for_owner(owner_id, page).await?;
        Ok(Page::new(items, total, page))
    }
}
