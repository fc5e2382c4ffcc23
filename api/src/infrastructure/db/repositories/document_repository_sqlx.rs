use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::document_repository::{DocumentRepository, NewDocument};
use crate::domain::documents::document::Document;
use crate::infrastructure::db::PgPool;

const DOCUMENT_COLUMNS: &str = "id, owner_id, company_id, listing_id, filename, content_type, \
                                size, storage_path, content_hash, created_at";

pub struct SqlxDocumentRepository {
    pub pool: PgPool,
}

impl SqlxDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_document(r: &PgRow) -> Document {
    Document {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        company_id: r.get("company_id"),
        listing_id: r.get("listing_id"),
        filename: r.get("filename"),
        content_type: r.get("content_type"),
        size: r.get("size"),
        storage_path: r.get("storage_path"),
        content_hash: r.get("content_hash"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl DocumentRepository for SqlxDocumentRepository {
    async fn insert(&self, doc: &NewDocument) -> anyhow::Result<Document> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO documents
                 (owner_id, company_id, listing_id, filename, content_type, size, storage_path, content_hash)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {DOCUMENT_COLUMNS}"#
        ))
        .bind(doc.owner_id)
        .bind(doc.company_id)
        .bind(doc.listing_id)
        .bind(&doc.filename)
        .bind(&doc.content_type)
        .bind(doc.size)
        .bind(&doc.storage_path)
        .bind(&doc.content_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_document(&row))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Document>> {
        let row = sqlx::query(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_document))
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        company_id: Option<Uuid>,
        listing_id: Option<Uuid>,
    ) -> anyhow::Result<Vec<Document>> {
        let rows = sqlx::query(&format!(
            r#"SELECT {DOCUMENT_COLUMNS} FROM documents
               WHERE owner_id = $1
                 AND ($2::uuid IS NULL OR company_id = $2)
                 AND ($3::uuid IS NULL OR listing_id = $3)
               ORDER BY created_at DESC"#
        ))
        .bind(owner_id)
        .bind(company_id)
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_document).collect())
    }

    async fn delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<Option<Document>> {
        let row = sqlx::query(&format!(
            "DELETE FROM documents WHERE id = $1 AND owner_id = $2 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_document))
    }
}
