use uuid::Uuid;

use super::ListingInput;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::Listing;

/// Edits go back through moderation.
pub struct UpdateListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> UpdateListing<'a, R> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: ListingInput,
    ) -> ServiceResult<Listing> {
        let draft = input.into_draft()?;
        let listing = self
            .repo
            .update_for_owner(id, owner_id, &draft)
            .await?
            .ok_or(ServiceError::NotFound("listing"))?;
        tracing::info!(listing_id = %id, "listing_resubmitted");
        Ok(listing)
    }
}
