use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::domain::consultants::application::{ApplicationDraft, ConsultantApplication};
use crate::domain::moderation::ReviewStatus;

#[async_trait]
pub trait ConsultantRepository: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        draft: &ApplicationDraft,
    ) -> anyhow::Result<ConsultantApplication>;
    async fn has_pending(&self, user_id: Uuid) -> anyhow::Result<bool>;
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ConsultantApplication>>;
    async fn list(
        &self,
        status: Option<ReviewStatus>,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<ConsultantApplication>, i64)>;
    /// Only moves applications out of `pending`.
    async fn review(
        &self,
        id: Uuid,
        to: ReviewStatus,
        note: Option<&str>,
    ) -> anyhow::Result<Option<ConsultantApplication>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ConsultantApplication>>;
}
