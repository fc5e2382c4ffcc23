use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::use_cases::documents::delete_document::DeleteDocument;
use crate::application::use_cases::documents::download_document::DownloadDocument;
use crate::application::use_cases::documents::list_documents::ListDocuments;
use crate::application::use_cases::documents::upload_document::{UploadDocument, UploadRequest};
use crate::bootstrap::app_context::AppContext;
use crate::domain::documents::document::Document;
use crate::presentation::http::auth::{Bearer, current_user, resolve_actor};
use crate::presentation::http::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub company_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub content_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            owner_id: d.owner_id,
            company_id: d.company_id,
            listing_id: d.listing_id,
            filename: d.filename,
            content_type: d.content_type,
            size: d.size,
            content_hash: d.content_hash,
            created_at: d.created_at,
        }
    }
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentMultipart {
    #[schema(value_type = String, format = Binary)]
    file: String,
    #[schema(value_type = Option<String>, format = Uuid)]
    company_id: Option<String>,
    #[schema(value_type = Option<String>, format = Uuid)]
    listing_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentsQuery {
    pub company_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/documents", get(list_documents).post(upload_document))
        .route("/documents/:id", axum::routing::delete(delete_document))
        .route("/documents/:id/download", get(download_document))
        .with_state(ctx)
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError(ServiceError::PayloadTooLarge(max_bytes))
    } else {
        ApiError::bad_request(format!("malformed multipart body: {}", err.body_text()))
    }
}

fn parse_uuid_field(name: &str, raw: &str) -> ApiResult<Option<Uuid>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| ApiError::bad_request(format!("{name} must be a UUID")))
}

#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body(content = UploadDocumentMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = DocumentResponse),
        (status = 400, body = ErrorBody),
        (status = 413, body = ErrorBody),
        (status = 415, body = ErrorBody)
    )
)]
pub async fn upload_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DocumentResponse>)> {
    let owner = current_user(&ctx, &bearer)?;
    let max_bytes = ctx.cfg.upload_max_bytes;

    let mut req = UploadRequest::default();
    let mut saw_file = false;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        match field.name() {
            Some("file") => {
                req.filename = field.file_name().map(str::to_string);
                req.content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
                req.bytes = data.to_vec();
                saw_file = true;
            }
            Some("company_id") => {
                let t = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
                req.company_id = parse_uuid_field("company_id", &t)?;
            }
            Some("listing_id") => {
                let t = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
                req.listing_id = parse_uuid_field("listing_id", &t)?;
            }
            _ => {}
        }
    }
    if !saw_file {
        return Err(ApiError::bad_request("file field is required"));
    }

    let documents = ctx.document_repo();
    let companies = ctx.company_repo();
    let listings = ctx.listing_repo();
    let storage = ctx.storage();
    let uc = UploadDocument {
        documents: documents.as_ref(),
        companies: companies.as_ref(),
        listings: listings.as_ref(),
        storage: storage.as_ref(),
        max_bytes,
    };
    let doc = uc.execute(owner, req).await?;
    Ok((StatusCode::CREATED, Json(doc.into())))
}

#[utoipa::path(get, path = "/api/documents", tag = "Documents", params(DocumentsQuery), responses(
    (status = 200, body = [DocumentResponse])
))]
pub async fn list_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(q): Query<DocumentsQuery>,
) -> ApiResult<Json<Vec<DocumentResponse>>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.document_repo();
    let uc = ListDocuments {
        repo: repo.as_ref(),
    };
    let items = uc.execute(owner, q.company_id, q.listing_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/documents/{id}/download", tag = "Documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "File bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, body = ErrorBody)
    ))]
pub async fn download_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let actor = resolve_actor(&ctx, &bearer)?;
    let repo = ctx.document_repo();
    let storage = ctx.storage();
    let uc = DownloadDocument {
        repo: repo.as_ref(),
        storage: storage.as_ref(),
    };
    let download = uc.execute(&actor, id).await?;

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&download.document.content_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        download.document.filename.replace(['"', '\\'], "_")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).unwrap_or(HeaderValue::from_static("attachment")),
    );
    Ok((headers, download.bytes).into_response())
}

#[utoipa::path(delete, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 204), (status = 404, body = ErrorBody)))]
pub async fn delete_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.document_repo();
    let storage = ctx.storage();
    let uc = DeleteDocument {
        repo: repo.as_ref(),
        storage: storage.as_ref(),
    };
    uc.execute(owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
