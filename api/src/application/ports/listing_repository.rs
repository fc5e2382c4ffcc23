use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::domain::listings::listing::{Listing, ListingDraft, ListingFilter, ListingInterest};
use crate::domain::moderation::ReviewStatus;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Inserts a pending listing unless the owner already has `limit` live ones;
    /// `None` when the limit is reached. Count and insert are atomic per owner.
    async fn create(
        &self,
        owner_id: Uuid,
        company_id: Uuid,
        draft: &ListingDraft,
        limit: i64,
    ) -> anyhow::Result<Option<Listing>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Listing>>;
    /// Writes the draft and moves the listing back to `pending`.
    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        draft: &ListingDraft,
    ) -> anyhow::Result<Option<Listing>>;
    async fn soft_delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool>;
    async fn search(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Listing>, i64)>;
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Listing>, i64)>;
    /// Compare-and-set on the review status; `None` when the listing is not in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: ReviewStatus,
        to: ReviewStatus,
        reason: Option<&str>,
    ) -> anyhow::Result<Option<Listing>>;
    /// `None` when the user already registered interest.
    async fn add_interest(
        &self,
        listing_id: Uuid,
        user_id: Uuid,
        message: Option<&str>,
    ) -> anyhow::Result<Option<ListingInterest>>;
    async fn list_interests(&self, listing_id: Uuid) -> anyhow::Result<Vec<ListingInterest>>;
}
