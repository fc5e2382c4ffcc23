use uuid::Uuid;

use super::ALLOWED_CONTENT_TYPES;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::company_repository::CompanyRepository;
use crate::application::ports::document_repository::{DocumentRepository, NewDocument};
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::documents::document::Document;

pub struct UploadDocument<'a, D, C, L, S>
where
    D: DocumentRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    L: ListingRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub documents: &'a D,
    pub companies: &'a C,
    pub listings: &'a L,
    pub storage: &'a S,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub company_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
}

/// Declared type without parameters, falling back to a guess from the extension.
fn resolve_content_type(declared: Option<&str>, filename: Option<&str>) -> Option<String> {
    declared
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
        .or_else(|| {
            filename
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|mime| mime.essence_str().to_string())
        })
}

impl<'a, D, C, L, S> UploadDocument<'a, D, C, L, S>
where
    D: DocumentRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    L: ListingRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, owner_id: Uuid, req: UploadRequest) -> ServiceResult<Document> {
        if req.bytes.is_empty() {
            return Err(ServiceError::validation("file is empty"));
        }
        if req.bytes.len() > self.max_bytes {
            return Err(ServiceError::PayloadTooLarge(self.max_bytes));
        }
        let content_type =
            resolve_content_type(req.content_type.as_deref(), req.filename.as_deref())
                .unwrap_or_else(|| "application/octet-stream".to_string());
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(ServiceError::UnsupportedMediaType(content_type));
        }

        if let Some(company_id) = req.company_id {
            match self.companies.get(company_id).await? {
                Some(c) if c.owner_id == owner_id => {}
                _ => return Err(ServiceError::NotFound("company")),
            }
        }
        if let Some(listing_id) = req.listing_id {
            match self.listings.get(listing_id).await? {
                Some(l) if l.owner_id == owner_id => {}
                _ => return Err(ServiceError::NotFound("listing")),
            }
        }

        let stored = self
            .storage
            .store(owner_id, req.filename.as_deref(), &req.bytes)
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, owner_id = %owner_id, "store_document_failed");
                err
            })?;
        let doc = self
            .documents
            .insert(&NewDocument {
                owner_id,
                company_id: req.company_id,
                listing_id: req.listing_id,
                filename: stored.filename,
                content_type,
                size: stored.size,
                storage_path: stored.relative_path.clone(),
                content_hash: stored.content_hash,
            })
            .await;
        match doc {
            Ok(doc) => {
                tracing::info!(document_id = %doc.id, owner_id = %owner_id, size = doc.size, "document_uploaded");
                Ok(doc)
            }
            Err(err) => {
                tracing::error!(error = ?err, owner_id = %owner_id, "insert_document_failed");
                if let Err(cleanup) = self.storage.delete(&stored.relative_path).await {
                    tracing::warn!(error = ?cleanup, path = %stored.relative_path, "orphan_upload_cleanup_failed");
                }
                Err(err.into())
            }
        }
    }
}
