use crate::application::error::{ServiceError, ServiceResult};
use crate::application::services::validation;
use crate::domain::listings::listing::ListingDraft;

pub mod browse_listings;
pub mod create_listing;
pub mod delete_listing;
pub mod express_interest;
pub mod get_listing;
pub mod list_interests;
pub mod list_my_listings;
pub mod update_listing;

#[derive(Debug, Clone, Default)]
pub struct ListingInput {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub asking_price_cents: Option<i64>,
}

impl ListingInput {
    pub(crate) fn into_draft(self) -> ServiceResult<ListingDraft> {
        if self.asking_price_cents.is_some_and(|p| p < 0) {
            return Err(ServiceError::validation("asking price must not be negative"));
        }
        Ok(ListingDraft {
            title: validation::required_text("title", &self.title, 200)?,
            description: validation::optional_text(self.description),
            category: validation::optional_text(self.category),
            location: validation::optional_text(self.location),
            asking_price_cents: self.asking_price_cents,
        })
    }
}
