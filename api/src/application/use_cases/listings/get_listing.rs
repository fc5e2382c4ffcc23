use uuid::Uuid;

use crate::application::access::Actor;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::Listing;
use crate::domain::moderation::ReviewStatus;

pub struct GetListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> GetListing<'a, R> {
    /// Approved listings are public; anything else only shows to its owner and admins.
    pub async fn execute(&self, actor: Option<&Actor>, id: Uuid) -> ServiceResult<Listing> {
        let listing = self
            .repo
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound("listing"))?;
        let visible = listing.status == ReviewStatus::Approved
            || actor.is_some_and(|a| a.can_view_owned(listing.owner_id));
        if !visible {
            return Err(ServiceError::NotFound("listing"));
        }
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::listings::listing::ListingDraft;

    #[tokio::test]
    async fn pending_listings_are_private() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let company = seed_company(&store, owner, "Acme").await;
        let listing = seed_listing(
            store.as_ref(),
            owner,
            company.id,
            ListingDraft {
                title: "Bakery".into(),
                ..Default::default()
            },
        )
        .await;
        let uc = GetListing {
            repo: store.as_ref(),
        };

        assert!(uc.execute(Some(&Actor::User(owner)), listing.id).await.is_ok());
        assert!(uc
            .execute(Some(&Actor::Admin(Uuid::new_v4())), listing.id)
            .await
            .is_ok());
        assert!(matches!(
            uc.execute(None, listing.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            uc.execute(Some(&Actor::User(Uuid::new_v4())), listing.id).await,
            Err(ServiceError::NotFound(_))
        ));

        store
            .transition(listing.id, ReviewStatus::Pending, ReviewStatus::Approved, None)
            .await
            .unwrap();
        assert!(uc.execute(None, listing.id).await.is_ok());
    }
}
