use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::services::validation;
use crate::domain::listings::listing::ListingInterest;
use crate::domain::moderation::ReviewStatus;

pub struct ExpressInterest<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ExpressInterest<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        listing_id: Uuid,
        message: Option<String>,
    ) -> ServiceResult<ListingInterest> {
        let listing = self
            .repo
            .get(listing_id)
            .await?
            .ok_or(ServiceError::NotFound("listing"))?;
        if listing.owner_id == user_id {
            return Err(ServiceError::validation(
                "you cannot express interest in your own listing",
            ));
        }
        if listing.status != ReviewStatus::Approved {
            return Err(ServiceError::NotFound("listing"));
        }
        let message = validation::optional_text(message);
        if message.as_ref().is_some_and(|m| m.chars().count() > 2000) {
            return Err(ServiceError::validation(
                "message must be at most 2000 characters",
            ));
        }
        let interest = self
            .repo
            .add_interest(listing_id, user_id, message.as_deref())
            .await?
            .ok_or_else(|| ServiceError::conflict("interest already registered"))?;
        tracing::info!(listing_id = %listing_id, user_id = %user_id, "listing_interest_added");
        Ok(interest)
    }
}
