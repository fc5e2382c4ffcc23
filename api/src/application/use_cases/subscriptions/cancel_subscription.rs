use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::subscription_repository::SubscriptionRepository;

pub struct CancelSubscription<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SubscriptionRepository + ?Sized> CancelSubscription<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<()> {
        if !self.repo.cancel_active(user_id).await? {
            return Err(ServiceError::NotFound("active subscription"));
        }
        tracing::info!(user_id = %user_id, "subscription_cancelled");
        Ok(())
    }
}
