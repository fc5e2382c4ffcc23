use uuid::Uuid;

use crate::application::error::ServiceResult;
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::domain::subscriptions::subscription::{Plan, Subscription};

pub struct CurrentSubscription<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SubscriptionRepository + ?Sized> CurrentSubscription<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<Option<(Subscription, Plan)>> {
        Ok(self
            .repo
            .active_subscription(user_id, chrono::Utc::now())
            .await?)
    }
}
