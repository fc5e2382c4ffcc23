use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::use_cases::consultants::my_applications::MyApplications;
use crate::application::use_cases::consultants::submit_application::SubmitApplication;
use crate::bootstrap::app_context::AppContext;
use crate::domain::consultants::application::ApplicationDraft;
use crate::presentation::http::admin::ApplicationResponse;
use crate::presentation::http::auth::{Bearer, current_user};
use crate::presentation::http::error::ApiResult;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationRequest {
    pub headline: String,
    pub expertise: String,
    pub years_experience: i32,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/consultants/applications",
            get(my_applications).post(submit_application),
        )
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/consultants/applications", tag = "Consultants", request_body = ApplicationRequest, responses(
    (status = 201, body = ApplicationResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn submit_application(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<ApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApplicationResponse>)> {
    let user = current_user(&ctx, &bearer)?;
    let users = ctx.user_repo();
    let applications = ctx.consultant_repo();
    let uc = SubmitApplication {
        users: users.as_ref(),
        applications: applications.as_ref(),
    };
    let draft = ApplicationDraft {
        headline: req.headline,
        expertise: req.expertise,
        years_experience: req.years_experience,
    };
    let app = uc.execute(user, draft).await?;
    Ok((StatusCode::CREATED, Json(app.into())))
}

#[utoipa::path(get, path = "/api/consultants/applications", tag = "Consultants", responses(
    (status = 200, body = [ApplicationResponse])
))]
pub async fn my_applications(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    let user = current_user(&ctx, &bearer)?;
    let repo = ctx.consultant_repo();
    let uc = MyApplications {
        repo: repo.as_ref(),
    };
    let items = uc.execute(user).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
