use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::domain::subscriptions::subscription::{Plan, Subscription};

pub struct Subscribe<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SubscriptionRepository + ?Sized> Subscribe<'a, R> {
    /// Replaces any running subscription of the user.
    pub async fn execute(&self, user_id: Uuid, plan_id: Uuid) -> ServiceResult<(Subscription, Plan)> {
        let plan = match self.repo.get_plan(plan_id).await? {
            Some(plan) if plan.is_active => plan,
            _ => return Err(ServiceError::NotFound("plan")),
        };
        let starts_at = chrono::Utc::now();
        let ends_at = starts_at + chrono::Duration::days(plan.duration_days as i64);
        let sub = self
            .repo
            .start_subscription(user_id, plan.id, starts_at, ends_at)
            .await?;
        tracing::info!(user_id = %user_id, plan_id = %plan.id, subscription_id = %sub.id, "subscription_started");
        Ok((sub, plan))
    }
}
