pub mod admin;
pub mod auth;
pub mod companies;
pub mod consultants;
pub mod documents;
pub mod error;
pub mod health;
pub mod listings;
pub mod paging;
pub mod subscriptions;

use axum::Router;

use crate::bootstrap::app_context::AppContext;

/// Every `/api` route except health, which needs the raw pool.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .nest("/api/auth", auth::routes(ctx.clone()))
        .nest("/api/admin/auth", auth::admin_routes(ctx.clone()))
        .nest("/api/admin", admin::routes(ctx.clone()))
        .nest("/api", companies::routes(ctx.clone()))
        .nest("/api", listings::routes(ctx.clone()))
        .nest("/api", documents::routes(ctx.clone()))
        .nest("/api", subscriptions::routes(ctx.clone()))
        .nest("/api", consultants::routes(ctx))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{HeaderMap, Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::application::services::tokens::{ROLE_ADMIN, ROLE_USER};
    use crate::application::test_support::*;
    use crate::bootstrap::app_context::AppServices;
    use crate::bootstrap::config::Config;

    struct TestApp {
        app: Router,
        ctx: AppContext,
        store: Arc<InMemoryStore>,
        mailer: Arc<RecordingMailer>,
    }

    impl TestApp {
        fn new() -> Self {
            let cfg = Config::from_lookup(|_| None).unwrap();
            let store = InMemoryStore::new();
            let mailer = RecordingMailer::new();
            let storage = MemoryStorage::new();
            let services = AppServices {
                user_repo: store.clone(),
                pending_repo: store.clone(),
                reset_repo: store.clone(),
                admin_repo: store.clone(),
                company_repo: store.clone(),
                listing_repo: store.clone(),
                document_repo: store.clone(),
                subscription_repo: store.clone(),
                consultant_repo: store.clone(),
                stats_repo: store.clone(),
                storage,
                mailer: mailer.clone(),
            };
            let ctx = AppContext::new(cfg, services);
            Self {
                app: router(ctx.clone()),
                ctx,
                store,
                mailer,
            }
        }

        fn user_token(&self, id: Uuid) -> String {
            self.ctx.tokens().issue_access(id, ROLE_USER).unwrap()
        }

        fn admin_token(&self) -> String {
            self.ctx
                .tokens()
                .issue_access(Uuid::new_v4(), ROLE_ADMIN)
                .unwrap()
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, HeaderMap, Value) {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some(t) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
            }
            let req = match body {
                Some(b) => req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(b.to_string()))
                    .unwrap(),
                None => req.body(Body::empty()).unwrap(),
            };
            self.dispatch(req).await
        }

        async fn dispatch(&self, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
            let resp = self.app.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, headers, value)
        }
    }

    fn multipart_request(token: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "biznest-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::post("/api/documents")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn registration_flow_sets_cookie_and_serves_me() {
        let t = TestApp::new();
        let (status, _, body) = t
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "name": "Dana",
                    "email": "Dana@Example.com",
                    "password": "Secret123"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "dana@example.com");
        let reg_token = body["token"].as_str().unwrap().to_string();
        let otp = t.mailer.last_otp().unwrap();

        let (status, _, body) = t
            .send(
                Method::POST,
                "/api/auth/register/verify",
                None,
                Some(json!({ "registration_token": reg_token, "otp": "000000x" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, headers, body) = t
            .send(
                Method::POST,
                "/api/auth/register/verify",
                None,
                Some(json!({ "registration_token": reg_token, "otp": otp })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("access_token="));
        assert!(cookie.contains("HttpOnly"));
        let access = body["access_token"].as_str().unwrap().to_string();

        // the cookie alone authenticates
        let cookie_pair = cookie.split(';').next().unwrap().to_string();
        let req = Request::get("/api/auth/me")
            .header(header::COOKIE, cookie_pair)
            .body(Body::empty())
            .unwrap();
        let (status, _, me) = t.dispatch(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "dana@example.com");
        assert_eq!(me["role"], "user");

        let (status, _, me) = t
            .send(
                Method::PATCH,
                "/api/auth/me",
                Some(&access),
                Some(json!({ "name": "Dana K" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["name"], "Dana K");
    }

    #[tokio::test]
    async fn login_errors_use_the_json_error_body() {
        let t = TestApp::new();
        seed_user(&t.store, "owner@example.com", "Secret123").await;
        let (status, _, body) = t
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "owner@example.com", "password": "wrong-pass1" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "success": false, "message": "unauthorized" }));

        let (status, _, _) = t.send(Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, headers, _) = t.send(Method::POST, "/api/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(headers[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn admin_routes_require_an_admin_token() {
        let t = TestApp::new();
        let user = seed_user(&t.store, "plain@example.com", "Secret123").await;
        let (status, _, _) = t.send(Method::GET, "/api/admin/stats", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = t.user_token(user.id);
        let (status, _, body) = t
            .send(Method::GET, "/api/admin/stats", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "admin access required");

        let admin = t.admin_token();
        let (status, _, body) = t
            .send(Method::GET, "/api/admin/stats", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"], 1);

        // admins cannot act as users
        let (status, _, _) = t
            .send(Method::GET, "/api/companies", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn listing_lifecycle_through_moderation_and_interest() {
        let t = TestApp::new();
        let owner = seed_user(&t.store, "seller@example.com", "Secret123").await;
        let buyer = seed_user(&t.store, "buyer@example.com", "Secret123").await;
        let owner_token = t.user_token(owner.id);
        let buyer_token = t.user_token(buyer.id);
        let admin = t.admin_token();

        let (status, _, company) = t
            .send(
                Method::POST,
                "/api/companies",
                Some(&owner_token),
                Some(json!({ "name": "Acme Bakery", "website": "https://acme.test" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let company_id = company["id"].as_str().unwrap().to_string();

        let (status, _, listing) = t
            .send(
                Method::POST,
                "/api/listings",
                Some(&owner_token),
                Some(json!({
                    "company_id": company_id,
                    "title": "Bakery for sale",
                    "category": "food",
                    "asking_price_cents": 25_000_000
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(listing["status"], "pending");
        assert_eq!(listing["company_name"], "Acme Bakery");
        let listing_id = listing["id"].as_str().unwrap().to_string();

        // free tier allows a single listing
        let (status, _, body) = t
            .send(
                Method::POST,
                "/api/listings",
                Some(&owner_token),
                Some(json!({ "company_id": company_id, "title": "Second" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "listing limit reached");

        let (_, _, page) = t.send(Method::GET, "/api/listings", None, None).await;
        assert_eq!(page["total"], 0);
        let uri = format!("/api/listings/{listing_id}");
        let (status, _, _) = t.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = t.send(Method::GET, &uri, Some(&owner_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let approve = format!("/api/admin/listings/{listing_id}/approve");
        let (status, _, approved) = t.send(Method::POST, &approve, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["status"], "approved");
        let (status, _, _) = t.send(Method::POST, &approve, Some(&admin), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, _, page) = t
            .send(Method::GET, "/api/listings?q=BAKERY&limit=5", None, None)
            .await;
        assert_eq!(page["total"], 1);
        assert_eq!(page["limit"], 5);
        assert_eq!(page["total_pages"], 1);

        let interests = format!("/api/listings/{listing_id}/interests");
        let (status, _, _) = t
            .send(
                Method::POST,
                &interests,
                Some(&owner_token),
                Some(json!({ "message": "mine" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _, _) = t
            .send(
                Method::POST,
                &interests,
                Some(&buyer_token),
                Some(json!({ "message": "Still available?" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _, _) = t
            .send(Method::POST, &interests, Some(&buyer_token), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _, list) = t
            .send(Method::GET, &interests, Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["user_email"], "buyer@example.com");
        let (status, _, _) = t.send(Method::GET, &interests, Some(&buyer_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn documents_upload_download_and_reject_unknown_types() {
        let t = TestApp::new();
        let owner = seed_user(&t.store, "docs@example.com", "Secret123").await;
        let token = t.user_token(owner.id);

        let (status, _, doc) = t
            .dispatch(multipart_request(&token, "deck.pdf", "application/pdf", b"%PDF-1.4 body"))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(doc["filename"], "deck.pdf");
        assert_eq!(doc["size"], 13);
        let doc_id = doc["id"].as_str().unwrap().to_string();

        let req = Request::get(format!("/api/documents/{doc_id}/download"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = t.app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 body");

        let (status, _, _) = t
            .dispatch(multipart_request(&token, "run.sh", "text/x-shellscript", b"echo hi"))
            .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let stranger = seed_user(&t.store, "stranger@example.com", "Secret123").await;
        let uri = format!("/api/documents/{doc_id}");
        let (status, _, _) = t
            .send(Method::DELETE, &uri, Some(&t.user_token(stranger.id)), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = t.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn plans_and_subscriptions() {
        let t = TestApp::new();
        let user = seed_user(&t.store, "sub@example.com", "Secret123").await;
        let token = t.user_token(user.id);
        let admin = t.admin_token();

        let plan_body = json!({
            "name": "Growth",
            "price_cents": 4900,
            "duration_days": 30,
            "max_listings": 5
        });
        let (status, _, plan) = t
            .send(Method::POST, "/api/admin/plans", Some(&admin), Some(plan_body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _, _) = t
            .send(Method::POST, "/api/admin/plans", Some(&admin), Some(plan_body))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, _, plans) = t.send(Method::GET, "/api/plans", None, None).await;
        assert_eq!(plans.as_array().unwrap().len(), 1);

        let (_, _, current) = t
            .send(Method::GET, "/api/subscriptions/current", Some(&token), None)
            .await;
        assert_eq!(current, Value::Null);

        let (status, _, sub) = t
            .send(
                Method::POST,
                "/api/subscriptions",
                Some(&token),
                Some(json!({ "plan_id": plan["id"] })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(sub["plan"]["name"], "Growth");
        assert_eq!(sub["status"], "active");

        let (_, _, current) = t
            .send(Method::GET, "/api/subscriptions/current", Some(&token), None)
            .await;
        assert_eq!(current["plan"]["max_listings"], 5);

        let (status, _, _) = t
            .send(Method::POST, "/api/subscriptions/cancel", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _, _) = t
            .send(Method::POST, "/api/subscriptions/cancel", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn consultant_application_review_promotes_user() {
        let t = TestApp::new();
        let user = seed_user(&t.store, "expert@example.com", "Secret123").await;
        let token = t.user_token(user.id);
        let admin = t.admin_token();

        let application = json!({
            "headline": "M&A advisor",
            "expertise": "Valuations and due diligence",
            "years_experience": 12
        });
        let (status, _, app) = t
            .send(
                Method::POST,
                "/api/consultants/applications",
                Some(&token),
                Some(application.clone()),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(app["status"], "pending");
        let (status, _, _) = t
            .send(
                Method::POST,
                "/api/consultants/applications",
                Some(&token),
                Some(application),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, _, page) = t
            .send(Method::GET, "/api/admin/consultants?status=pending", Some(&admin), None)
            .await;
        assert_eq!(page["total"], 1);

        let review = format!("/api/admin/consultants/{}/review", app["id"].as_str().unwrap());
        let (status, _, reviewed) = t
            .send(
                Method::POST,
                &review,
                Some(&admin),
                Some(json!({ "decision": "approve", "note": "welcome" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reviewed["status"], "approved");

        let (_, _, me) = t.send(Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(me["role"], "consultant");

        let (status, _, blocked) = t
            .send(
                Method::PUT,
                &format!("/api/admin/users/{}/status", user.id),
                Some(&admin),
                Some(json!({ "status": "blocked" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(blocked["status"], "blocked");
        let (status, _, _) = t
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "expert@example.com", "password": "Secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
