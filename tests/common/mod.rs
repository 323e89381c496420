#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use dashboard::router::init_router;
use dashboard::state::AppState;
use dashboard_auth::{AuthGate, Claims};
use dashboard_config::{AccessConfig, CorsConfig, JwtConfig};
use dashboard_db::{MemoryStore, seed_baseline};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration_test_secret";
pub const PASSWORD: &str = "password";

/// App over a seeded in-memory store with the default permission matrix.
pub async fn setup_test_app() -> Router {
    setup_test_app_with(AccessConfig::default()).await
}

pub async fn setup_test_app_with(access: AccessConfig) -> Router {
    let store = Arc::new(MemoryStore::new());
    // low cost keeps the suite fast
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    seed_baseline(store.as_ref(), &hash).await.unwrap();

    let gate = AuthGate::new(test_jwt_config(), &access).unwrap();
    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
    };
    init_router(AppState::new(gate, store, cors))
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, 3600)
}

/// Signs arbitrary claims with `secret`, bypassing the issuer.
pub fn forge_token(role: &str, exp_offset_secs: i64, secret: &str) -> String {
    let now = unix_now();
    let claims = Claims {
        sub: "forged".to_string(),
        role: role.to_string(),
        exp: (now + exp_offset_secs) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Sends one request and returns the status plus the body as JSON.
///
/// Empty bodies come back as `Value::Null`, non-JSON bodies as a string.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/auth",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn admin_token(app: &Router) -> String {
    login(app, "user1", PASSWORD).await
}

pub async fn user_token(app: &Router) -> String {
    login(app, "user2", PASSWORD).await
}

/// Names in a page response, in order.
pub fn names(page: &Value, field: &str) -> Vec<String> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap().to_string())
        .collect()
}
