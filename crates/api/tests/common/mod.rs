//! Shared helpers for the API integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bakery_api::auth::jwt::{issue_session_token, JwtConfig};
use bakery_api::config::ServerConfig;
use bakery_api::router::build_app_router;
use bakery_api::state::AppState;
use bakery_core::checkout::{CheckoutSessionRequest, GatewayError, GatewaySession, PaymentGateway};
use bakery_core::roles::Role;
use bakery_core::types::DbId;
use bakery_db::models::product::{CreateProductSize, ProductInput, ProductWithSizes};
use bakery_db::models::user::CreateUser;
use bakery_db::repositories::{ProductRepo, ProfileRepo, UserRepo};
use bakery_events::EventBus;
use bakery_payments::StripeConfig;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            session_ttl_mins: 60,
        },
        checkout_currency: "inr".to_string(),
        email_domain: "bakingtales.com".to_string(),
        stripe: StripeConfig::new("sk_test_unused"),
    }
}

// ---------------------------------------------------------------------------
// Fake payment gateway
// ---------------------------------------------------------------------------

/// Records every session request and answers with a fixed hosted URL, or
/// fails when `fail` is set.
#[derive(Default)]
pub struct FakeGateway {
    pub requests: Mutex<Vec<CheckoutSessionRequest>>,
    pub fail: AtomicBool,
}

impl FakeGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CheckoutSessionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<GatewaySession, GatewayError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::new(
                "Invalid API Key provided",
                serde_json::json!({ "error": { "type": "invalid_request_error" } }),
            ));
        }
        let id = format!("cs_test_{}", requests.len());
        Ok(GatewaySession {
            url: format!("https://pay.test/{id}"),
            id,
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with a default fake gateway.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(FakeGateway::default()))
}

/// Build the full application router around the given gateway, through the
/// same builder production uses.
pub fn build_test_app_with(pool: PgPool, gateway: Arc<FakeGateway>) -> Router {
    build_test_app_for(test_state(pool, gateway))
}

/// Handler state over `pool`, for tests that need the event bus too.
pub fn test_state(pool: PgPool, gateway: Arc<FakeGateway>) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        event_bus: Arc::new(EventBus::default()),
        payment_gateway: gateway,
    }
}

/// Build the router around an existing state, sharing its bus.
pub fn build_test_app_for(state: AppState) -> Router {
    let config = state.config.clone();
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Create a user with the given role directly in the database and return its
/// id plus a valid bearer token.
pub async fn create_user(pool: &PgPool, phone: &str, role: Role) -> (DbId, String) {
    let password_hash =
        bakery_api::auth::password::hash_password("secret123").expect("hashing should succeed");
    let user = UserRepo::create_with_profile(
        pool,
        &CreateUser {
            email: format!("{phone}@bakingtales.com"),
            password_hash,
            full_name: format!("Test {role}"),
            phone: phone.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    if role != Role::User {
        ProfileRepo::update_role(pool, user.id, role)
            .await
            .expect("role update should succeed");
    }

    let token = issue_session_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    (user.id, token)
}

/// Create an available product with the given tags and `(label, price)` sizes.
pub async fn create_product(
    pool: &PgPool,
    name: &str,
    tags: &[&str],
    sizes: &[(&str, i64)],
) -> ProductWithSizes {
    let input = ProductInput {
        name: name.to_string(),
        description: Some(format!("{name} from the oven")),
        category: "cakes".to_string(),
        images: vec![format!("https://cdn.test/{}.jpg", name.to_lowercase())],
        video: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_available: true,
        is_featured: false,
    };
    let sizes: Vec<CreateProductSize> = sizes
        .iter()
        .map(|(label, price)| CreateProductSize {
            size_label: label.to_string(),
            price: Decimal::from(*price),
        })
        .collect();
    let slug = format!("{}-1", name.to_lowercase().replace(' ', "-"));
    ProductRepo::create(pool, &slug, &input, &sizes)
        .await
        .expect("product creation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
