use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::subscriptions::cancel_subscription::CancelSubscription;
use crate::application::use_cases::subscriptions::current_subscription::CurrentSubscription;
use crate::application::use_cases::subscriptions::list_plans::ListPlans;
use crate::application::use_cases::subscriptions::subscribe::Subscribe;
use crate::bootstrap::app_context::AppContext;
use crate::domain::subscriptions::subscription::{Plan, Subscription, SubscriptionStatus};
use crate::presentation::http::auth::{Bearer, current_user};
use crate::presentation::http::error::ApiResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    pub max_listings: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Plan> for PlanResponse {
    fn from(p: Plan) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price_cents: p.price_cents,
            duration_days: p.duration_days,
            max_listings: p.max_listings,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub status: SubscriptionStatus,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub plan: PlanResponse,
}

impl SubscriptionResponse {
    fn new(sub: Subscription, plan: Plan) -> Self {
        Self {
            id: sub.id,
            status: sub.status,
            starts_at: sub.starts_at,
            ends_at: sub.ends_at,
            created_at: sub.created_at,
            plan: plan.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub plan_id: Uuid,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/subscriptions", post(subscribe))
        .route("/subscriptions/current", get(current_subscription))
        .route("/subscriptions/cancel", post(cancel_subscription))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/plans", tag = "Subscriptions", security(()), responses(
    (status = 200, body = [PlanResponse])
))]
pub async fn list_plans(State(ctx): State<AppContext>) -> ApiResult<Json<Vec<PlanResponse>>> {
    let repo = ctx.subscription_repo();
    let uc = ListPlans {
        repo: repo.as_ref(),
        include_inactive: false,
    };
    let plans = uc.execute().await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/subscriptions", tag = "Subscriptions", request_body = SubscribeRequest, responses(
    (status = 201, body = SubscriptionResponse),
    (status = 404, body = ErrorBody)
))]
pub async fn subscribe(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<SubscribeRequest>,
) -> ApiResult<(StatusCode, Json<SubscriptionResponse>)> {
    let user = current_user(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = Subscribe {
        repo: repo.as_ref(),
    };
    let (sub, plan) = uc.execute(user, req.plan_id).await?;
    Ok((StatusCode::CREATED, Json(SubscriptionResponse::new(sub, plan))))
}

/// `null` when the caller has no running subscription.
#[utoipa::path(get, path = "/api/subscriptions/current", tag = "Subscriptions", responses(
    (status = 200, body = Option<SubscriptionResponse>)
))]
pub async fn current_subscription(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Json<Option<SubscriptionResponse>>> {
    let user = current_user(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = CurrentSubscription {
        repo: repo.as_ref(),
    };
    let current = uc.execute(user).await?;
    Ok(Json(
        current.map(|(sub, plan)| SubscriptionResponse::new(sub, plan)),
    ))
}

#[utoipa::path(post, path = "/api/subscriptions/cancel", tag = "Subscriptions", responses(
    (status = 204),
    (status = 404, body = ErrorBody)
))]
pub async fn cancel_subscription(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<StatusCode> {
    let user = current_user(&ctx, &bearer)?;
    let repo = ctx.subscription_repo();
    let uc = CancelSubscription {
        repo: repo.as_ref(),
    };
    uc.execute(user).await?;
    Ok(StatusCode::NO_CONTENT)
}
