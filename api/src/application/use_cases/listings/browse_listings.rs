use crate::application::dto::pagination::{Page, PageRequest};
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::services::validation;
use crate::domain::listings::listing::{Listing, ListingFilter};
use crate::domain::moderation::ReviewStatus;

/// Public marketplace search. Only approved listings are ever returned.
pub struct BrowseListings<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> BrowseListings<'a, R> {
    pub async fn execute(
        &self,
        filter: ListingFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<Listing>> {
        if let (Some(min), Some(max)) = (filter.min_price_cents, filter.max_price_cents) {
            if min > max {
                return Err(ServiceError::validation("min_price must not exceed max_price"));
            }
        }
        let filter = ListingFilter {
            q: validation::optional_text(filter.q),
            category: validation::optional_text(filter.category),
            location: validation::optional_text(filter.location),
            status: Some(ReviewStatus::Approved),
            ..filter
        };
        let (items, total) = self.repo.search(&filter, page).await?;
        Ok(Page::new(items, total, page))
    }
}
