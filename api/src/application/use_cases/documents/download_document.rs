use uuid::Uuid;

use crate::application::access::Actor;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::documents::document::Document;

pub struct DownloadDocument<'a, R, S>
where
    R: DocumentRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub repo: &'a R,
    pub storage: &'a S,
}

pub struct DocumentDownload {
    pub document: Document,
    pub bytes: Vec<u8>,
}

impl<'a, R, S> DownloadDocument<'a, R, S>
where
    R: DocumentRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> ServiceResult<DocumentDownload> {
        let document = match self.repo.get(id).await? {
            Some(doc) if actor.can_view_owned(doc.owner_id) => doc,
            _ => return Err(ServiceError::NotFound("document")),
        };
        let bytes = self
            .storage
            .read(&document.storage_path)
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, document_id = %id, "document_file_unreadable");
                ServiceError::NotFound("document")
            })?;
        Ok(DocumentDownload { document, bytes })
    }
}
