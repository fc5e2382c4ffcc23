use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::documents::document::Document;

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner_id: Uuid,
    pub company_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub storage_path: String,
    pub content_hash: String,
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, doc: &NewDocument) -> anyhow::Result<Document>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Document>>;
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        company_id: Option<Uuid>,
        listing_id: Option<Uuid>,
    ) -> anyhow::Result<Vec<Document>>;
    /// Returns the removed row so its file can be cleaned up.
    async fn delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<Option<Document>>;
}
