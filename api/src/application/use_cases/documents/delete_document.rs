use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::storage_port::StoragePort;

pub struct DeleteDocument<'a, R, S>
where
    R: DocumentRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub repo: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> DeleteDocument<'a, R, S>
where
    R: DocumentRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, owner_id: Uuid, id: Uuid) -> ServiceResult<()> {
        let doc = self
            .repo
            .delete_for_owner(id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound("document"))?;
        // The row is gone either way; a leftover file is only logged.
        if let Err(err) = self.storage.delete(&doc.storage_path).await {
            tracing::warn!(error = ?err, document_id = %id, path = %doc.storage_path, "document_file_delete_failed");
        }
        tracing::info!(document_id = %id, owner_id = %owner_id, "document_deleted");
        Ok(())
    }
}
