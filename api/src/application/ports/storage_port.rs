use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    /// Path relative to the uploads root, `/`-separated.
    pub relative_path: String,
    pub size: i64,
    pub content_hash: String,
}

#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn store(
        &self,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredFile>;
    async fn read(&self, relative_path: &str) -> anyhow::Result<Vec<u8>>;
    async fn delete(&self, relative_path: &str) -> anyhow::Result<()>;
}
