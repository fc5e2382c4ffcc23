use crate::application::error::ServiceResult;
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::domain::subscriptions::subscription::Plan;

pub struct ListPlans<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
    /// Admins also see deactivated plans.
    pub include_inactive: bool,
}

impl<'a, R: SubscriptionRepository + ?Sized> ListPlans<'a, R> {
    pub async fn execute(&self) -> ServiceResult<Vec<Plan>> {
        Ok(self.repo.list_plans(!self.include_inactive).await?)
    }
}
