use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use biznest_api::bootstrap::app_context::{AppContext, AppServices};
use biznest_api::bootstrap::config::Config;
use biznest_api::bootstrap::seed::seed_admin;
use biznest_api::presentation::http as web;

// Room for multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
        paths(
            web::auth::register,
            web::auth::verify_registration,
            web::auth::resend_otp,
            web::auth::login,
            web::auth::logout,
            web::auth::me,
            web::auth::update_me,
            web::auth::forgot_password,
            web::auth::reset_password,
            web::auth::change_password,
            web::auth::admin_login,
            web::companies::list_companies,
            web::companies::create_company,
            web::companies::get_company,
            web::companies::update_company,
            web::companies::delete_company,
            web::listings::browse_listings,
            web::listings::create_listing,
            web::listings::my_listings,
            web::listings::get_listing,
            web::listings::update_listing,
            web::listings::delete_listing,
            web::listings::express_interest,
            web::listings::list_interests,
            web::documents::upload_document,
            web::documents::list_documents,
            web::documents::download_document,
            web::documents::delete_document,
            web::subscriptions::list_plans,
            web::subscriptions::subscribe,
            web::subscriptions::current_subscription,
            web::subscriptions::cancel_subscription,
            web::consultants::submit_application,
            web::consultants::my_applications,
            web::admin::dashboard_stats,
            web::admin::list_users,
            web::admin::get_user,
            web::admin::delete_user,
            web::admin::set_user_status,
            web::admin::list_listings,
            web::admin::approve_listing,
            web::admin::reject_listing,
            web::admin::list_all_plans,
            web::admin::create_plan,
            web::admin::update_plan,
            web::admin::deactivate_plan,
            web::admin::list_applications,
            web::admin::review_application,
            web::health::health,
        ),
        components(schemas(
            web::error::ErrorBody,
            web::auth::RegisterRequest,
            web::auth::OtpChallengeResponse,
            web::auth::VerifyRequest,
            web::auth::ResendRequest,
            web::auth::LoginRequest,
            web::auth::LoginResponse,
            web::auth::UserResponse,
            web::auth::UpdateProfileRequest,
            web::auth::ForgotPasswordRequest,
            web::auth::ResetPasswordRequest,
            web::auth::ChangePasswordRequest,
            web::auth::AdminResponse,
            web::auth::AdminLoginResponse,
            web::companies::CompanyRequest,
            web::companies::CompanyResponse,
            web::listings::CreateListingRequest,
            web::listings::UpdateListingRequest,
            web::listings::ListingResponse,
            web::listings::InterestRequest,
            web::listings::InterestResponse,
            web::documents::DocumentResponse,
            web::documents::UploadDocumentMultipart,
            web::subscriptions::PlanResponse,
            web::subscriptions::SubscriptionResponse,
            web::subscriptions::SubscribeRequest,
            web::consultants::ApplicationRequest,
            web::admin::StatsResponse,
            web::admin::ApplicationResponse,
            web::admin::UserStatusRequest,
            web::admin::RejectRequest,
            web::admin::ReviewRequest,
            web::admin::PlanRequest,
            web::paging::ListingPage,
            web::paging::UserPage,
            web::paging::ApplicationPage,
            web::health::HealthResp,
            biznest_api::domain::users::user::UserRole,
            biznest_api::domain::users::user::UserStatus,
            biznest_api::domain::moderation::ReviewStatus,
            biznest_api::domain::subscriptions::subscription::SubscriptionStatus,
            biznest_api::application::use_cases::admin::review_application::ReviewDecision,
        )),
        tags(
            (name = "Auth", description = "Registration, OTP verification and sessions"),
            (name = "Companies", description = "Company profiles owned by users"),
            (name = "Listings", description = "Business listings and buyer interest"),
            (name = "Documents", description = "Supporting document uploads"),
            (name = "Subscriptions", description = "Plans and subscriptions"),
            (name = "Consultants", description = "Consultant applications"),
            (name = "Admin", description = "Moderation and plan management"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = ?e, "FRONTEND_URL is not a valid origin; mirroring requests");
            base.allow_origin(AllowOrigin::mirror_request())
        }
        // Development convenience; production refuses to start without FRONTEND_URL.
        None => base.allow_origin(AllowOrigin::mirror_request()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "ctrl_c_listener_failed");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biznest_api=debug,axum=info,tower_http=info")),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        production = cfg.is_production,
        uploads_dir = %cfg.uploads_dir,
        "Starting BizNest API"
    );

    let pool = biznest_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    biznest_api::infrastructure::db::migrate(&pool).await?;

    if let Err(e) = tokio::fs::create_dir_all(&cfg.uploads_dir).await {
        tracing::warn!(error = ?e, dir = %cfg.uploads_dir, "Failed to create uploads dir");
    }

    let services = AppServices::from_pool(&cfg, pool.clone());
    let ctx = AppContext::new(cfg.clone(), services);
    seed_admin(&cfg, ctx.admin_repo().as_ref()).await?;

    let app = web::router(ctx)
        .nest("/api", web::health::routes(pool))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(
            cfg.upload_max_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
