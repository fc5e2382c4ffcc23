use uuid::Uuid;

use crate::application::error::ServiceResult;
use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::Document;

pub struct ListDocuments<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> ListDocuments<'a, R> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        company_id: Option<Uuid>,
        listing_id: Option<Uuid>,
    ) -> ServiceResult<Vec<Document>> {
        Ok(self
            .repo
            .list_for_owner(owner_id, company_id, listing_id)
            .await?)
    }
}
