use crate::application::dto::pagination::{Page, PageRequest};
use crate::application::error::ServiceResult;
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::{Listing, ListingFilter};
use crate::domain::moderation::ReviewStatus;

/// Moderation queue; any status, including listings not yet reviewed.
pub struct ListListingsForReview<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ListListingsForReview<'a, R> {
    pub async fn execute(
        &self,
        status: Option<ReviewStatus>,
        page: PageRequest,
    ) -> ServiceResult<Page<Listing>> {
        let filter = ListingFilter {
            status,
            ..Default::default()
        };
        let (items, total) = self.repo.search(&filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}
