#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use orders_api::app::build_router;
use orders_api::config::Config;
use orders_api::middleware::metrics::HttpMetrics;
use orders_api::repos::order_repo::OrderRepo;
use orders_api::services::audit::{AuditEvent, AuditSink, AuditTrail};
use orders_api::services::auth::build_decision_point;
use orders_api::services::policy::PolicyTable;
use orders_api::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";
pub const ISSUER: &str = "demo-auth";
pub const AUDIENCE: &str = "orders-api";

pub fn config() -> Config {
    Config::from_lookup(|key| match key {
        "AUTH_ISSUER" => Some(ISSUER.to_string()),
        "AUTH_AUDIENCE" => Some(AUDIENCE.to_string()),
        "ACCESS_JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

/// Keeps every audit event it receives.
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<AuditEvent>>);

impl RecordingSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingSink {
    fn record(&self, event: &AuditEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

pub struct TestApp {
    pub router: Router,
    pub sink: Arc<RecordingSink>,
}

pub fn app() -> TestApp {
    let config = config();
    let sink = Arc::new(RecordingSink::default());

    let state = AppState::new(
        build_decision_point(&config).unwrap(),
        PolicyTable::defaults().unwrap(),
        OrderRepo::seeded(),
        Arc::new(AuditTrail::forwarding_to(sink.clone())),
        HttpMetrics::new().unwrap(),
    );

    TestApp {
        router: build_router(state, &config),
        sink,
    }
}

pub fn claims(sub: &str, role: &str, scopes: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "sub": sub,
        "iat": Utc::now().timestamp(),
        "exp": (Utc::now() + Duration::minutes(10)).timestamp(),
        "role": role,
        "scp": scopes,
        "tenant": "demo-tenant",
    })
}

pub fn sign(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn reader_token() -> String {
    sign(&claims("alice", "reader", &["orders:read"]))
}

pub fn admin_token() -> String {
    sign(&claims("bob", "admin", &["orders:read", "orders:write"]))
}

/// Request with a bearer token and compliant device/risk signals.
pub fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-device-trust", "managed")
        .header("x-risk", "low");
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn text_body(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
