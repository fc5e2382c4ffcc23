use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::companies::CompanyInput;
use crate::application::use_cases::companies::create_company::CreateCompany;
use crate::application::use_cases::companies::delete_company::DeleteCompany;
use crate::application::use_cases::companies::get_company::GetCompany;
use crate::application::use_cases::companies::list_companies::ListCompanies;
use crate::application::use_cases::companies::update_company::UpdateCompany;
use crate::bootstrap::app_context::AppContext;
use crate::domain::companies::company::Company;
use crate::presentation::http::auth::{Bearer, current_user};
use crate::presentation::http::error::ApiResult;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompanyRequest {
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub registration_number: Option<String>,
}

impl From<CompanyRequest> for CompanyInput {
    fn from(r: CompanyRequest) -> Self {
        CompanyInput {
            name: r.name,
            description: r.description,
            industry: r.industry,
            website: r.website,
            location: r.location,
            registration_number: r.registration_number,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub registration_number: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            owner_id: c.owner_id,
            name: c.name,
            description: c.description,
            industry: c.industry,
            website: c.website,
            location: c.location,
            registration_number: c.registration_number,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/companies", tag = "Companies", responses(
    (status = 200, body = [CompanyResponse]),
    (status = 401, body = ErrorBody)
))]
pub async fn list_companies(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Json<Vec<CompanyResponse>>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.company_repo();
    let uc = ListCompanies {
        repo: repo.as_ref(),
    };
    let items = uc.execute(owner).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/companies", tag = "Companies", request_body = CompanyRequest, responses(
    (status = 201, body = CompanyResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn create_company(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<CompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.company_repo();
    let uc = CreateCompany {
        repo: repo.as_ref(),
    };
    let company = uc.execute(owner, req.into()).await?;
    Ok((StatusCode::CREATED, Json(company.into())))
}

#[utoipa::path(get, path = "/api/companies/{id}", tag = "Companies",
    params(("id" = Uuid, Path, description = "Company ID")),
    responses((status = 200, body = CompanyResponse), (status = 404, body = ErrorBody)))]
pub async fn get_company(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CompanyResponse>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.company_repo();
    let uc = GetCompany {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(owner, id).await?.into()))
}

#[utoipa::path(put, path = "/api/companies/{id}", tag = "Companies", request_body = CompanyRequest,
    params(("id" = Uuid, Path, description = "Company ID")),
    responses((status = 200, body = CompanyResponse), (status = 404, body = ErrorBody)))]
pub async fn update_company(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<CompanyRequest>,
) -> ApiResult<Json<CompanyResponse>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.company_repo();
    let uc = UpdateCompany {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(owner, id, req.into()).await?.into()))
}

#[utoipa::path(delete, path = "/api/companies/{id}", tag = "Companies",
    params(("id" = Uuid, Path, description = "Company ID")),
    responses((status = 204), (status = 404, body = ErrorBody)))]
pub async fn delete_company(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.company_repo();
    let uc = DeleteCompany {
        repo: repo.as_ref(),
    };
    uc.execute(owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
