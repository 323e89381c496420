mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use dashboard_auth::verify_token;
use dashboard_config::access::parse_grants;
use dashboard_config::AccessConfig;
use common::{
    PASSWORD, TEST_SECRET, admin_token, forge_token, get, login, send, setup_test_app,
    setup_test_app_with, test_jwt_config, user_token,
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_success_carries_role() {
    let app = setup_test_app().await;

    let token = login(&app, "user1", PASSWORD).await;
    let claims = verify_token(&token, &test_jwt_config()).unwrap();
    assert_eq!(claims.sub, "user1");
    assert_eq!(claims.role, "admin");

    let token = login(&app, "user2", PASSWORD).await;
    let claims = verify_token(&token, &test_jwt_config()).unwrap();
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_login_then_list_services() {
    let app = setup_test_app().await;
    let token = login(&app, "user1", "password").await;

    let (status, body) = get(&app, "/v1/services", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.to_string().contains("Service 1"));
}

#[tokio::test]
async fn test_login_hides_which_part_was_wrong() {
    let app = setup_test_app().await;

    let (wrong_password, wrong_password_body) = send(
        &app,
        Method::POST,
        "/v1/auth",
        None,
        Some(json!({ "username": "user1", "password": "nope" })),
    )
    .await;
    let (unknown_user, unknown_user_body) = send(
        &app,
        Method::POST,
        "/v1/auth",
        None,
        Some(json!({ "username": "ghost", "password": "nope" })),
    )
    .await;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body, unknown_user_body);
}

#[tokio::test]
async fn test_login_rejects_empty_fields() {
    let app = setup_test_app().await;

    for body in [
        json!({ "username": "", "password": "password" }),
        json!({ "username": "user1", "password": "" }),
        json!({ "username": "user1" }),
        json!({}),
    ] {
        let (status, _) = send(&app, Method::POST, "/v1/auth", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_login_rejects_malformed_json() {
    let app = setup_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_openapi_document_is_public() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/v1/services").is_some());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, Method::GET, "/v1/services", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_authorization_header_is_unauthorized() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;

    for value in [format!("Token {token}"), token.clone(), "Bearer".to_string()] {
        let request = Request::builder()
            .uri("/v1/services")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_are_unauthorized() {
    let app = setup_test_app().await;

    let expired = forge_token("admin", -60, TEST_SECRET);
    let (status, _) = get(&app, "/v1/services", &expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = forge_token("admin", 3600, "some_other_secret");
    let (status, _) = get(&app, "/v1/services", &foreign).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/v1/services", "not.a.jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_hmac_token_is_unauthorized() {
    let app = setup_test_app().await;
    let token = forge_token("admin", 3600, TEST_SECRET);
    // Same payload and signature under an RS256 header
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[0] = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
    let swapped = parts.join(".");

    let (status, _) = get(&app, "/v1/services", &swapped).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_role_can_read_but_not_write() {
    let app = setup_test_app().await;
    let token = user_token(&app).await;

    let (status, _) = get(&app, "/v1/services", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/services",
        Some(&token),
        Some(json!({ "service_name": "Service 3" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, "/v1/users?username=user1", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unauthenticated_wins_over_forbidden() {
    let app = setup_test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/services",
        None,
        Some(json!({ "service_name": "Service 3" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_has_no_permissions() {
    let app = setup_test_app().await;
    let token = forge_token("auditor", 3600, TEST_SECRET);

    let (status, _) = get(&app, "/v1/services", &token).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_permission_matrix_is_configurable() {
    let access = AccessConfig {
        grants: parse_grants("admin=GET;user=GET,POST").unwrap(),
        ..AccessConfig::default()
    };
    let app = setup_test_app_with(access).await;

    let user = user_token(&app).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/services",
        Some(&user),
        Some(json!({ "service_name": "Service 3" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let admin = admin_token(&app).await;
    let (status, _) = send(&app, Method::DELETE, "/v1/services?name=Service%203", Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejections_use_error_envelope() {
    let app = setup_test_app().await;

    let request = Request::builder()
        .uri("/v1/users")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert!(body["error"].is_string());
}
