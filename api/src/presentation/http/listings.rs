use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::application::use_cases::listings::ListingInput;
use crate::application::use_cases::listings::browse_listings::BrowseListings;
use crate::application::use_cases::listings::create_listing::CreateListing;
use crate::application::use_cases::listings::delete_listing::DeleteListing;
use crate::application::use_cases::listings::express_interest::ExpressInterest;
use crate::application::use_cases::listings::get_listing::GetListing;
use crate::application::use_cases::listings::list_interests::ListInterests;
use crate::application::use_cases::listings::list_my_listings::ListMyListings;
use crate::application::use_cases::listings::update_listing::UpdateListing;
use crate::bootstrap::app_context::AppContext;
use crate::domain::listings::listing::{Listing, ListingFilter, ListingInterest};
use crate::domain::moderation::ReviewStatus;
use crate::presentation::http::auth::{Bearer, current_user, optional_actor};
use crate::presentation::http::error::ApiResult;
use crate::presentation::http::paging::Paginated;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub asking_price_cents: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListingRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub asking_price_cents: Option<i64>,
}

impl From<UpdateListingRequest> for ListingInput {
    fn from(r: UpdateListingRequest) -> Self {
        ListingInput {
            title: r.title,
            description: r.description,
            category: r.category,
            location: r.location,
            asking_price_cents: r.asking_price_cents,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub asking_price_cents: Option<i64>,
    pub status: ReviewStatus,
    pub rejection_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Listing> for ListingResponse {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            company_id: l.company_id,
            company_name: l.company_name,
            owner_id: l.owner_id,
            title: l.title,
            description: l.description,
            category: l.category,
            location: l.location,
            asking_price_cents: l.asking_price_cents,
            status: l.status,
            rejection_reason: l.rejection_reason,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

/// Public catalogue filters. Prices are in cents.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageParams> for PageRequest {
    fn from(p: PageParams) -> Self {
        PageRequest::new(p.page, p.limit)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InterestRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InterestResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ListingInterest> for InterestResponse {
    fn from(i: ListingInterest) -> Self {
        Self {
            id: i.id,
            listing_id: i.listing_id,
            user_id: i.user_id,
            user_name: i.user_name,
            user_email: i.user_email,
            message: i.message,
            created_at: i.created_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/listings", get(browse_listings).post(create_listing))
        .route("/listings/mine", get(my_listings))
        .route(
            "/listings/:id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route(
            "/listings/:id/interests",
            get(list_interests).post(express_interest),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/listings", tag = "Listings", params(BrowseQuery), security(()), responses(
    (status = 200, body = ListingPage),
    (status = 400, body = ErrorBody)
))]
pub async fn browse_listings(
    State(ctx): State<AppContext>,
    Query(q): Query<BrowseQuery>,
) -> ApiResult<Json<Paginated<ListingResponse>>> {
    let repo = ctx.listing_repo();
    let uc = BrowseListings {
        repo: repo.as_ref(),
    };
    let filter = ListingFilter {
        q: q.q,
        category: q.category,
        location: q.location,
        min_price_cents: q.min_price,
        max_price_cents: q.max_price,
        status: None,
    };
    let page = uc.execute(filter, PageRequest::new(q.page, q.limit)).await?;
    Ok(Json(Paginated::from_page(page)))
}

#[utoipa::path(post, path = "/api/listings", tag = "Listings", request_body = CreateListingRequest, responses(
    (status = 201, body = ListingResponse),
    (status = 400, body = ErrorBody),
    (status = 403, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn create_listing(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<CreateListingRequest>,
) -> ApiResult<(StatusCode, Json<ListingResponse>)> {
    let owner = current_user(&ctx, &bearer)?;
    let companies = ctx.company_repo();
    let listings = ctx.listing_repo();
    let subscriptions = ctx.subscription_repo();
    let uc = CreateListing {
        companies: companies.as_ref(),
        listings: listings.as_ref(),
        subscriptions: subscriptions.as_ref(),
        free_limit: ctx.cfg.free_listing_limit,
    };
    let input = ListingInput {
        title: req.title,
        description: req.description,
        category: req.category,
        location: req.location,
        asking_price_cents: req.asking_price_cents,
    };
    let listing = uc.execute(owner, req.company_id, input).await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

#[utoipa::path(get, path = "/api/listings/mine", tag = "Listings", params(PageParams), responses(
    (status = 200, body = ListingPage)
))]
pub async fn my_listings(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(p): Query<PageParams>,
) -> ApiResult<Json<Paginated<ListingResponse>>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = ListMyListings {
        repo: repo.as_ref(),
    };
    let page = uc.execute(owner, p.into()).await?;
    Ok(Json(Paginated::from_page(page)))
}

#[utoipa::path(get, path = "/api/listings/{id}", tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, body = ListingResponse), (status = 404, body = ErrorBody)))]
pub async fn get_listing(
    State(ctx): State<AppContext>,
    bearer: Option<Bearer>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListingResponse>> {
    let actor = optional_actor(&ctx, bearer.as_ref());
    let repo = ctx.listing_repo();
    let uc = GetListing {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(actor.as_ref(), id).await?.into()))
}

#[utoipa::path(put, path = "/api/listings/{id}", tag = "Listings", request_body = UpdateListingRequest,
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, body = ListingResponse), (status = 404, body = ErrorBody)))]
pub async fn update_listing(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateListingRequest>,
) -> ApiResult<Json<ListingResponse>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = UpdateListing {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(owner, id, req.into()).await?.into()))
}

#[utoipa::path(delete, path = "/api/listings/{id}", tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses((status = 204), (status = 404, body = ErrorBody)))]
pub async fn delete_listing(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = DeleteListing {
        repo: repo.as_ref(),
    };
    uc.execute(owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/listings/{id}/interests", tag = "Listings", request_body = InterestRequest,
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 201, body = InterestResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    ))]
pub async fn express_interest(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<InterestRequest>,
) -> ApiResult<(StatusCode, Json<InterestResponse>)> {
    let user = current_user(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = ExpressInterest {
        repo: repo.as_ref(),
    };
    let interest = uc.execute(user, id, req.message).await?;
    Ok((StatusCode::CREATED, Json(interest.into())))
}

#[utoipa::path(get, path = "/api/listings/{id}/interests", tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, body = [InterestResponse]), (status = 404, body = ErrorBody)))]
pub async fn list_interests(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<InterestResponse>>> {
    let owner = current_user(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = ListInterests {
        repo: repo.as_ref(),
    };
    let items = uc.execute(owner, id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
