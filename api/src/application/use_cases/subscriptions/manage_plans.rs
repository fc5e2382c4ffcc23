use uuid::Uuid;

use super::PlanInput;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::domain::subscriptions::subscription::Plan;

pub struct CreatePlan<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SubscriptionRepository + ?Sized> CreatePlan<'a, R> {
    pub async fn execute(&self, input: PlanInput) -> ServiceResult<Plan> {
        let draft = input.into_draft()?;
        if self.repo.find_plan_by_name(&draft.name).await?.is_some() {
            return Err(ServiceError::conflict("a plan with this name already exists"));
        }
        let plan = self.repo.create_plan(&draft).await?;
        tracing::info!(plan_id = %plan.id, name = %plan.name, "plan_created");
        Ok(plan)
    }
}

pub struct UpdatePlan<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SubscriptionRepository + ?Sized> UpdatePlan<'a, R> {
    pub async fn execute(&self, id: Uuid, input: PlanInput) -> ServiceResult<Plan> {
        let draft = input.into_draft()?;
        if let Some(other) = self.repo.find_plan_by_name(&draft.name).await? {
            if other.id != id {
                return Err(ServiceError::conflict("a plan with this name already exists"));
            }
        }
        self.repo
            .update_plan(id, &draft)
            .await?
            .ok_or(ServiceError::NotFound("plan"))
    }
}

/// Existing subscriptions keep running; the plan just stops being offered.
pub struct DeactivatePlan<'a, R: SubscriptionRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SubscriptionRepository + ?Sized> DeactivatePlan<'a, R> {
    pub async fn execute(&self, id: Uuid) -> ServiceResult<()> {
        if !self.repo.set_plan_active(id, false).await? {
            return Err(ServiceError::NotFound("plan"));
        }
        tracing::info!(plan_id = %id, "plan_deactivated");
        Ok(())
    }
}
