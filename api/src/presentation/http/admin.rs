use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::application::dto::stats::DashboardStats;
use crate::application::ports::user_repository::UserFilter;
use crate::application::use_cases::admin::dashboard_stats::GetDashboardStats;
use crate::application::use_cases::admin::delete_user::DeleteUser;
use crate::application::use_cases::admin::get_user::GetUser;
use crate::application::use_cases::admin::list_applications::ListApplications;
use crate::application::use_cases::admin::list_listings::ListListingsForReview;
use crate::application::use_cases::admin::list_users::ListUsers;
use crate::application::use_cases::admin::moderate_listing::ModerateListing;
use crate::application::use_cases::admin::review_application::{
    ReviewApplication, ReviewDecision,
};
use crate::application::use_cases::admin::set_user_status::SetUserStatus;
use crate::application::use_cases::subscriptions::PlanInput;
use crate::application::use_cases::subscriptions::list_plans::ListPlans;
use crate::application::use_cases::subscriptions::manage_plans::{
    CreatePlan, DeactivatePlan, UpdatePlan,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::consultants::application::ConsultantApplication;
use crate::domain::moderation::ReviewStatus;
use crate::domain::users::user::{UserRole, UserStatus};
use crate::presentation::http::auth::{Bearer, UserResponse, current_admin};
use crate::presentation::http::error::ApiResult;
use crate::presentation::http::listings::ListingResponse;
use crate::presentation::http::paging::Paginated;
use crate::presentation::http::subscriptions::PlanResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub users: i64,
    pub blocked_users: i64,
    pub consultants: i64,
    pub companies: i64,
    pub listings_pending: i64,
    pub listings_approved: i64,
    pub listings_rejected: i64,
    pub consultant_applications_pending: i64,
    pub active_subscriptions: i64,
}

impl From<DashboardStats> for StatsResponse {
    fn from(s: DashboardStats) -> Self {
        Self {
            users: s.users,
            blocked_users: s.blocked_users,
            consultants: s.consultants,
            companies: s.companies,
            listings_pending: s.listings_pending,
            listings_approved: s.listings_approved,
            listings_rejected: s.listings_rejected,
            consultant_applications_pending: s.consultant_applications_pending,
            active_subscriptions: s.active_subscriptions,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub headline: String,
    pub expertise: String,
    pub years_experience: i32,
    pub status: ReviewStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ConsultantApplication> for ApplicationResponse {
    fn from(a: ConsultantApplication) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            headline: a.headline,
            expertise: a.expertise,
            years_experience: a.years_experience,
            status: a.status,
            review_note: a.review_note,
            reviewed_at: a.reviewed_at,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsersQuery {
    /// Matches name or email.
    pub q: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    pub status: Option<ReviewStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    pub max_listings: i32,
}

impl From<PlanRequest> for PlanInput {
    fn from(r: PlanRequest) -> Self {
        PlanInput {
            name: r.name,
            description: r.description,
            price_cents: r.price_cents,
            duration_days: r.duration_days,
            max_listings: r.max_listings,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/users/:id/status", put(set_user_status))
        .route("/listings", get(list_listings))
        .route("/listings/:id/approve", post(approve_listing))
        .route("/listings/:id/reject", post(reject_listing))
        .route("/plans", get(list_all_plans).post(create_plan))
        .route("/plans/:id", put(update_plan).delete(deactivate_plan))
        .route("/consultants", get(list_applications))
        .route("/consultants/:id/review", post(review_application))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/admin/stats", tag = "Admin", responses(
    (status = 200, body = StatsResponse),
    (status = 403, body = ErrorBody)
))]
pub async fn dashboard_stats(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Json<StatsResponse>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.stats_repo();
    let uc = GetDashboardStats {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute().await?.into()))
}

#[utoipa::path(get, path = "/api/admin/users", tag = "Admin", params(UsersQuery), responses(
    (status = 200, body = UserPage)
))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(q): Query<UsersQuery>,
) -> ApiResult<Json<Paginated<UserResponse>>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let filter = UserFilter {
        q: q.q,
        status: q.status,
        role: q.role,
    };
    let page = uc.execute(filter, PageRequest::new(q.page, q.limit)).await?;
    Ok(Json(Paginated::from_page(page)))
}

#[utoipa::path(get, path = "/api/admin/users/{id}", tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, body = UserResponse), (status = 404, body = ErrorBody)))]
pub async fn get_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = GetUser {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}

#[utoipa::path(delete, path = "/api/admin/users/{id}", tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 204), (status = 404, body = ErrorBody)))]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = DeleteUser {
        repo: repo.as_ref(),
    };
    uc.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/api/admin/users/{id}/status", tag = "Admin", request_body = UserStatusRequest,
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, body = UserResponse), (status = 404, body = ErrorBody)))]
pub async fn set_user_status(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<UserStatusRequest>,
) -> ApiResult<Json<UserResponse>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = SetUserStatus {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id, req.status).await?.into()))
}

#[utoipa::path(get, path = "/api/admin/listings", tag = "Admin", params(ReviewQuery), responses(
    (status = 200, body = ListingPage)
))]
pub async fn list_listings(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(q): Query<ReviewQuery>,
) -> ApiResult<Json<Paginated<ListingResponse>>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = ListListingsForReview {
        repo: repo.as_ref(),
    };
    let page = uc
        .execute(q.status, PageRequest::new(q.page, q.limit))
        .await?;
    Ok(Json(Paginated::from_page(page)))
}

#[utoipa::path(post, path = "/api/admin/listings/{id}/approve", tag = "Admin",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, body = ListingResponse),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    ))]
pub async fn approve_listing(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListingResponse>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = ModerateListing {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.approve(id).await?.into()))
}

#[utoipa::path(post, path = "/api/admin/listings/{id}/reject", tag = "Admin", request_body = RejectRequest,
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, body = ListingResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody)
    ))]
pub async fn reject_listing(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> ApiResult<Json<ListingResponse>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.listing_repo();
    let uc = ModerateListing {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.reject(id, &req.reason).await?.into()))
}

/// Includes inactive plans.
#[utoipa::path(get, path = "/api/admin/plans", tag = "Admin", responses(
    (status = 200, body = [PlanResponse])
))]
pub async fn list_all_plans(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Json<Vec<PlanResponse>>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = ListPlans {
        repo: repo.as_ref(),
        include_inactive: true,
    };
    let plans = uc.execute().await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/admin/plans", tag = "Admin", request_body = PlanRequest, responses(
    (status = 201, body = PlanResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn create_plan(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<PlanRequest>,
) -> ApiResult<(StatusCode, Json<PlanResponse>)> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = CreatePlan {
        repo: repo.as_ref(),
    };
    let plan = uc.execute(req.into()).await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

#[utoipa::path(put, path = "/api/admin/plans/{id}", tag = "Admin", request_body = PlanRequest,
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, body = PlanResponse),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    ))]
pub async fn update_plan(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<PlanRequest>,
) -> ApiResult<Json<PlanResponse>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = UpdatePlan {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id, req.into()).await?.into()))
}

/// Plans are never hard-deleted; existing subscriptions keep their plan.
#[utoipa::path(delete, path = "/api/admin/plans/{id}", tag = "Admin",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses((status = 204), (status = 404, body = ErrorBody)))]
pub async fn deactivate_plan(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = DeactivatePlan {
        repo: repo.as_ref(),
    };
    uc.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/admin/consultants", tag = "Admin", params(ReviewQuery), responses(
    (status = 200, body = ApplicationPage)
))]
pub async fn list_applications(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(q): Query<ReviewQuery>,
) -> ApiResult<Json<Paginated<ApplicationResponse>>> {
    current_admin(&ctx, &bearer)?;
    let repo = ctx.consultant_repo();
    let uc = ListApplications {
        repo: repo.as_ref(),
    };
    let page = uc
        .execute(q.status, PageRequest::new(q.page, q.limit))
        .await?;
    Ok(Json(Paginated::from_page(page)))
}

#[utoipa::path(post, path = "/api/admin/consultants/{id}/review", tag = "Admin", request_body = ReviewRequest,
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, body = ApplicationResponse),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    ))]
pub async fn review_application(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    current_admin(&ctx, &bearer)?;
    let users = ctx.user_repo();
    let applications = ctx.consultant_repo();
    let uc = ReviewApplication {
        users: users.as_ref(),
        applications: applications.as_ref(),
    };
    Ok(Json(uc.execute(id, req.decision, req.note).await?.into()))
}
