use uuid::Uuid;

use super::ListingInput;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::company_repository::CompanyRepository;
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::domain::listings::listing::Listing;

/// Creates a pending listing, bounded by the owner's plan.
pub struct CreateListing<'a, C, L, S>
where
    C: CompanyRepository + ?Sized,
    L: ListingRepository + ?Sized,
    S: SubscriptionRepository + ?Sized,
{
    pub companies: &'a C,
    pub listings: &'a L,
    pub subscriptions: &'a S,
    /// Listing allowance of users without an active subscription.
    pub free_limit: i64,
}

impl<'a, C, L, S> CreateListing<'a, C, L, S>
where
    C: CompanyRepository + ?Sized,
    L: ListingRepository + ?Sized,
    S: SubscriptionRepository + ?Sized,
{
    pub async fn execute(
        &self,
        owner_id: Uuid,
        company_id: Uuid,
        input: ListingInput,
    ) -> ServiceResult<Listing> {
        let draft = input.into_draft()?;
        match self.companies.get(company_id).await? {
            Some(company) if company.owner_id == owner_id => {}
            _ => return Err(ServiceError::NotFound("company")),
        }

        let limit = match self
            .subscriptions
            .active_subscription(owner_id, chrono::Utc::now())
            .await?
        {
            Some((_, plan)) => plan.max_listings as i64,
            None => self.free_limit,
        };
        let Some(listing) = self
            .listings
            .create(owner_id, company_id, &draft, limit)
            .await?
        else {
            tracing::debug!(owner_id = %owner_id, limit, "listing_limit_reached");
            return Err(ServiceError::forbidden("listing limit reached"));
        };
        tracing::info!(listing_id = %listing.id, owner_id = %owner_id, "listing_created");
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::moderation::ReviewStatus;

    fn input(title: &str) -> ListingInput {
        ListingInput {
            title: title.into(),
            asking_price_cents: Some(25_000_000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn free_tier_allows_one_listing() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let company = seed_company(&store, owner, "Acme").await;
        let uc = CreateListing {
            companies: store.as_ref(),
            listings: store.as_ref(),
            subscriptions: store.as_ref(),
            free_limit: 1,
        };
        let first = uc.execute(owner, company.id, input("Bakery")).await.unwrap();
        assert_eq!(first.status, ReviewStatus::Pending);
        assert_eq!(first.company_name, "Acme");
        assert!(matches!(
            uc.execute(owner, company.id, input("Second")).await,
            Err(ServiceError::Forbidden(msg)) if msg == "listing limit reached"
        ));
    }

    #[tokio::test]
    async fn active_plan_raises_the_limit() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let company = seed_company(&store, owner, "Acme").await;
        let plan = seed_plan(&store, "Pro", 3).await;
        let now = chrono::Utc::now();
        store
            .start_subscription(owner, plan.id, now, now + chrono::Duration::days(30))
            .await
            .unwrap();
        let uc = CreateListing {
            companies: store.as_ref(),
            listings: store.as_ref(),
            subscriptions: store.as_ref(),
            free_limit: 1,
        };
        for i in 0..3 {
            uc.execute(owner, company.id, input(&format!("L{i}")))
                .await
                .unwrap();
        }
        assert!(matches!(
            uc.execute(owner, company.id, input("L3")).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn rejects_foreign_company_and_bad_input() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let company = seed_company(&store, owner, "Acme").await;
        let uc = CreateListing {
            companies: store.as_ref(),
            listings: store.as_ref(),
            subscriptions: store.as_ref(),
            free_limit: 5,
        };
        assert!(matches!(
            uc.execute(Uuid::new_v4(), company.id, input("Bakery")).await,
            Err(ServiceError::NotFound("company"))
        ));
        let negative = ListingInput {
            title: "Bakery".into(),
            asking_price_cents: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            uc.execute(owner, company.id, negative).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            uc.execute(owner, company.id, input("   ")).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn simultaneous_creates_respect_the_limit() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let company = seed_company(&store, owner, "Acme").await;
        let uc = CreateListing {
            companies: store.as_ref(),
            listings: store.as_ref(),
            subscriptions: store.as_ref(),
            free_limit: 1,
        };
        let (a, b) = tokio::join!(
            uc.execute(owner, company.id, input("A")),
            uc.execute(owner, company.id, input("B"))
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let (_, total) = ListingRepository::list_for_owner(store.as_ref(), owner, Default::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
    }
}
