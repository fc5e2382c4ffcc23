use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::dto::auth::{AuthSession, OtpChallenge};
use crate::application::error::ServiceError;
use crate::application::use_cases::auth::admin_login::AdminLogin;
use crate::application::use_cases::auth::change_password::ChangePassword;
use crate::application::use_cases::auth::forgot_password::ForgotPassword;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::use_cases::auth::resend_otp::ResendOtp;
use crate::application::use_cases::auth::reset_password::ResetPassword;
use crate::application::use_cases::auth::update_profile::UpdateProfile;
use crate::application::use_cases::auth::verify_registration::VerifyRegistration;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::{User, UserRole, UserStatus};
use crate::presentation::http::error::{ApiError, ApiResult};

const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpChallengeResponse {
    /// Pass back to `register/verify`, `register/resend` or `password/reset`.
    pub token: String,
    pub email: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<OtpChallenge> for OtpChallengeResponse {
    fn from(c: OtpChallenge) -> Self {
        Self {
            token: c.token,
            email: c.email,
            expires_at: c.expires_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub registration_token: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResendRequest {
    pub registration_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            phone: u.phone,
            role: u.role,
            status: u.status,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub access_token: String,
    pub admin: AdminResponse,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/register/verify", post(verify_registration))
        .route("/register/resend", post(resend_otp))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me).patch(update_me))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset", post(reset_password))
        .route("/password/change", post(change_password))
        .with_state(ctx)
}

pub fn admin_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", post(admin_login))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 200, body = OtpChallengeResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<OtpChallengeResponse>> {
    let users = ctx.user_repo();
    let pending = ctx.pending_repo();
    let mailer = ctx.mailer();
    let uc = RegisterUc {
        users: users.as_ref(),
        pending: pending.as_ref(),
        mailer: mailer.as_ref(),
        tokens: ctx.tokens(),
        policy: ctx.otp_policy(),
    };
    let dto = RegisterDto {
        name: req.name,
        email: req.email,
        phone: req.phone,
        password: req.password,
    };
    let challenge = uc.execute(&dto).await?;
    Ok(Json(challenge.into()))
}

#[utoipa::path(post, path = "/api/auth/register/verify", tag = "Auth", request_body = VerifyRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 400, body = ErrorBody),
    (status = 410, body = ErrorBody),
    (status = 429, body = ErrorBody)
))]
pub async fn verify_registration(
    State(ctx): State<AppContext>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<(HeaderMap, Json<LoginResponse>)> {
    let users = ctx.user_repo();
    let pending = ctx.pending_repo();
    let uc = VerifyRegistration {
        users: users.as_ref(),
        pending: pending.as_ref(),
        tokens: ctx.tokens(),
        policy: ctx.otp_policy(),
    };
    let session = uc.execute(&req.registration_token, &req.otp).await?;
    Ok(session_response(&ctx, session))
}

#[utoipa::path(post, path = "/api/auth/register/resend", tag = "Auth", request_body = ResendRequest, security(()), responses(
    (status = 200, body = OtpChallengeResponse),
    (status = 429, body = ErrorBody)
))]
pub async fn resend_otp(
    State(ctx): State<AppContext>,
    Json(req): Json<ResendRequest>,
) -> ApiResult<Json<OtpChallengeResponse>> {
    let pending = ctx.pending_repo();
    let mailer = ctx.mailer();
    let uc = ResendOtp {
        pending: pending.as_ref(),
        mailer: mailer.as_ref(),
        tokens: ctx.tokens(),
        policy: ctx.otp_policy(),
    };
    let challenge = uc.execute(&req.registration_token).await?;
    Ok(Json(challenge.into()))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, body = ErrorBody),
    (status = 403, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<LoginResponse>)> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
        tokens: ctx.tokens(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let session = uc.execute(&dto).await?;
    Ok(session_response(&ctx, session))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (StatusCode, HeaderMap) {
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie("", 0, cookie_secure(&ctx));
    if let Ok(v) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, v);
    }
    (StatusCode::NO_CONTENT, headers)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth", responses(
    (status = 200, body = UserResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn me(State(ctx): State<AppContext>, bearer: Bearer) -> ApiResult<Json<UserResponse>> {
    let user_id = current_user(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(user_id).await?.into()))
}

#[utoipa::path(patch, path = "/api/auth/me", tag = "Auth", request_body = UpdateProfileRequest, responses(
    (status = 200, body = UserResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn update_me(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = current_user(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
    };
    let user = uc.execute(user_id, req.name, req.phone).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(post, path = "/api/auth/password/forgot", tag = "Auth", request_body = ForgotPasswordRequest, security(()), responses(
    (status = 200, body = OtpChallengeResponse)
))]
pub async fn forgot_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<OtpChallengeResponse>> {
    let users = ctx.user_repo();
    let resets = ctx.reset_repo();
    let mailer = ctx.mailer();
    let uc = ForgotPassword {
        users: users.as_ref(),
        resets: resets.as_ref(),
        mailer: mailer.as_ref(),
        tokens: ctx.tokens(),
        policy: ctx.otp_policy(),
    };
    Ok(Json(uc.execute(&req.email).await?.into()))
}

#[utoipa::path(post, path = "/api/auth/password/reset", tag = "Auth", request_body = ResetPasswordRequest, security(()), responses(
    (status = 204),
    (status = 400, body = ErrorBody),
    (status = 410, body = ErrorBody),
    (status = 429, body = ErrorBody)
))]
pub async fn reset_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<StatusCode> {
    let users = ctx.user_repo();
    let resets = ctx.reset_repo();
    let uc = ResetPassword {
        users: users.as_ref(),
        resets: resets.as_ref(),
        tokens: ctx.tokens(),
        policy: ctx.otp_policy(),
    };
    uc.execute(&req.reset_token, &req.otp, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/auth/password/change", tag = "Auth", request_body = ChangePasswordRequest, responses(
    (status = 204),
    (status = 400, body = ErrorBody),
    (status = 401, body = ErrorBody)
))]
pub async fn change_password(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let user_id = current_user(&ctx, &bearer)?;
    let repo = ctx.user_repo();
    let uc = ChangePassword {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, &req.current_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/admin/auth/login", tag = "Admin", request_body = LoginRequest, security(()), responses(
    (status = 200, body = AdminLoginResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn admin_login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<AdminLoginResponse>)> {
    let repo = ctx.admin_repo();
    let uc = AdminLogin {
        repo: repo.as_ref(),
        tokens: ctx.tokens(),
    };
    let session = uc.execute(&req.email, &req.password).await?;
    let headers = access_cookie_headers(&ctx, &session.access_token);
    Ok((
        headers,
        Json(AdminLoginResponse {
            access_token: session.access_token,
            admin: AdminResponse {
                id: session.admin.id,
                name: session.admin.name,
                email: session.admin.email,
            },
        }),
    ))
}

fn session_response(ctx: &AppContext, session: AuthSession) -> (HeaderMap, Json<LoginResponse>) {
    let headers = access_cookie_headers(ctx, &session.access_token);
    (
        headers,
        Json(LoginResponse {
            access_token: session.access_token,
            user: session.user.into(),
        }),
    )
}

fn cookie_secure(ctx: &AppContext) -> bool {
    ctx.cfg
        .frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false)
}

fn access_cookie_headers(ctx: &AppContext, token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(token, ctx.tokens().access_ttl_secs(), cookie_secure(ctx));
    match HeaderValue::from_str(&cookie) {
        Ok(v) => {
            headers.insert(header::SET_COOKIE, v);
        }
        Err(e) => tracing::warn!(error = ?e, "access_cookie_not_set"),
    }
    headers
}

// --- Bearer extractor ---

/// Raw access token from the `Authorization` header or the `access_token` cookie.
pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.to_string()));
            }
        }

        if let Some(cookie_hdr) = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, ACCESS_COOKIE) {
                return Ok(Bearer(token));
            }
        }

        Err(ApiError(ServiceError::Unauthorized))
    }
}

pub(crate) fn resolve_actor(ctx: &AppContext, bearer: &Bearer) -> ApiResult<Actor> {
    ctx.tokens()
        .resolve_actor(&bearer.0)
        .ok_or(ApiError(ServiceError::Unauthorized))
}

/// Id of a signed-in user account; admins are refused.
pub(crate) fn current_user(ctx: &AppContext, bearer: &Bearer) -> ApiResult<Uuid> {
    let actor = resolve_actor(ctx, bearer)?;
    Ok(access::require_user(&actor)?)
}

pub(crate) fn current_admin(ctx: &AppContext, bearer: &Bearer) -> ApiResult<Uuid> {
    let actor = resolve_actor(ctx, bearer)?;
    Ok(access::require_admin(&actor)?)
}

/// Like [`resolve_actor`] but anonymous callers and bad tokens yield `None`.
pub(crate) fn optional_actor(ctx: &AppContext, bearer: Option<&Bearer>) -> Option<Actor> {
    bearer.and_then(|b| ctx.tokens().resolve_actor(&b.0))
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(|part| part.trim())
        .find_map(|part| {
            let (k, v) = part.split_once('=')?;
            (k == name && !v.is_empty()).then(|| v.to_string())
        })
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut parts = vec![format!("{ACCESS_COOKIE}={token}"), "HttpOnly".to_string()];
    if secure {
        parts.push("Secure".to_string());
    }
    parts.push("Path=/".to_string());
    parts.push(format!("Max-Age={}", max_age_secs.max(0)));
    parts.push("SameSite=Lax".to_string());
    parts.join("; ")
}
