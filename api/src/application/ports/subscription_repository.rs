use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::subscriptions::subscription::{Plan, PlanDraft, Subscription};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn list_plans(&self, active_only: bool) -> anyhow::Result<Vec<Plan>>;
    async fn get_plan(&self, id: Uuid) -> anyhow::Result<Option<Plan>>;
    async fn find_plan_by_name(&self, name: &str) -> anyhow::Result<Option<Plan>>;
    async fn create_plan(&self, draft: &PlanDraft) -> anyhow::Result<Plan>;
    async fn update_plan(&self, id: Uuid, draft: &PlanDraft) -> anyhow::Result<Option<Plan>>;
    async fn set_plan_active(&self, id: Uuid, active: bool) -> anyhow::Result<bool>;
    async fn active_subscription(
        &self,
        user_id: Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<Option<(Subscription, Plan)>>;
    /// Cancels any active subscription of the user and starts a new one.
    async fn start_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        starts_at: chrono::DateTime<chrono::Utc>,
        ends_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<Subscription>;
    async fn cancel_active(&self, user_id: Uuid) -> anyhow::Result<bool>;
}
