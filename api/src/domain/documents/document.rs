use uuid::Uuid;

/// An uploaded file kept on disk and referenced by a DB row.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub company_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub storage_path: String,
    pub content_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
