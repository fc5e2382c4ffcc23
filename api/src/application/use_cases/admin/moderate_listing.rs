use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::services::validation;
use crate::domain::listings::listing::Listing;
use crate::domain::moderation::ReviewStatus;

/// Moves a pending listing to its review outcome.
pub struct ModerateListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ModerateListing<'a, R> {
    pub async fn approve(&self, id: Uuid) -> ServiceResult<Listing> {
        self.transition(id, ReviewStatus::Approved, None).await
    }

    pub async fn reject(&self, id: Uuid, reason: &str) -> ServiceResult<Listing> {
        let reason = validation::required_text("reason", reason, 1000)?;
        self.transition(id, ReviewStatus::Rejected, Some(&reason))
            .await
    }

    async fn transition(
        &self,
        id: Uuid,
        to: ReviewStatus,
        reason: Option<&str>,
    ) -> ServiceResult<Listing> {
        if let Some(listing) = self
            .repo
            .transition(id, ReviewStatus::Pending, to, reason)
            .await?
        {
            tracing::info!(listing_id = %id, status = to.as_str(), "listing_reviewed");
            return Ok(listing);
        }
        match self.repo.get(id).await? {
            Some(current) => Err(ServiceError::conflict(format!(
                "listing is already {}",
                current.status
            ))),
            None => Err(ServiceError::NotFound("listing")),
        }
    }
}
