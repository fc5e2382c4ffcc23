use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::companies::company::{Company, CompanyDraft};

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, draft: &CompanyDraft) -> anyhow::Result<Company>;
    async fn list_for_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Company>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Company>>;
    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        draft: &CompanyDraft,
    ) -> anyhow::Result<Option<Company>>;
    /// Soft-deletes the company together with its listings.
    async fn soft_delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool>;
}
