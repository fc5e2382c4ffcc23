use crate::application::error::{ServiceError, ServiceResult};
use crate::application::services::validation;
use crate::domain::subscriptions::subscription::PlanDraft;

pub mod cancel_subscription;
pub mod current_subscription;
pub mod list_plans;
pub mod manage_plans;
pub mod subscribe;

#[derive(Debug, Clone, Default)]
pub struct PlanInput {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    pub max_listings: i32,
}

impl PlanInput {
    pub(crate) fn into_draft(self) -> ServiceResult<PlanDraft> {
        if self.price_cents < 0 {
            return Err(ServiceError::validation("price must not be negative"));
        }
        if self.duration_days < 1 {
            return Err(ServiceError::validation("duration must be at least one day"));
        }
        if self.max_listings < 1 {
            return Err(ServiceError::validation("max_listings must be at least 1"));
        }
        Ok(PlanDraft {
            name: validation::required_text("name", &self.name, 100)?,
            description: validation::optional_text(self.description),
            price_cents: self.price_cents,
            duration_days: self.duration_days,
            max_listings: self.max_listings,
        })
    }
}
