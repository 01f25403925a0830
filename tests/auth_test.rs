//! Registration and token issuance through the HTTP surface

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{body_json, create_test_app};
use eventboard::accounts;

#[tokio::test]
async fn test_register_account() {
    let app = create_test_app().await;

    let response = app
        .post_json(
            "/api/accounts",
            serde_json::json!({"email": "test@example.com", "password": "Password123"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(body["roles"], serde_json::json!(["USER"]));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicate_and_invalid_input() {
    let app = create_test_app().await;

    let payload = serde_json::json!({"email": "test@example.com", "password": "Password123"});
    let response = app.post_json("/api/accounts", payload.clone(), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.post_json("/api/accounts", payload, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/api/accounts",
            serde_json::json!({"email": "not-an-email", "password": "Password123"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/api/accounts",
            serde_json::json!({"email": "short@example.com", "password": "short"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_issuance() {
    let app = create_test_app().await;
    app.register_and_token("test@example.com", "Password123")
        .await;

    let form = serde_urlencoded::to_string([
        ("grant_type", "password"),
        ("username", "test@example.com"),
        ("password", "Password123"),
    ])
    .unwrap();

    let response = app
        .request(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].as_str().unwrap().contains('.'));
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 7 * 24 * 60 * 60);
}

async fn token_request(app: &common::TestApp, fields: [(&str, &str); 3]) -> StatusCode {
    let form = serde_urlencoded::to_string(fields).unwrap();
    let response = app
        .request(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await;
    response.status()
}

#[tokio::test]
async fn test_token_rejects_bad_credentials() {
    let app = create_test_app().await;
    app.register_and_token("test@example.com", "Password123")
        .await;

    // Unknown account
    let status = token_request(
        &app,
        [
            ("grant_type", "password"),
            ("username", "missing@example.com"),
            ("password", "Password123"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Wrong password
    let status = token_request(
        &app,
        [
            ("grant_type", "password"),
            ("username", "test@example.com"),
            ("password", "WrongPassword"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unsupported grant type
    let status = token_request(
        &app,
        [
            ("grant_type", "client_credentials"),
            ("username", "test@example.com"),
            ("password", "Password123"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_lookup_error_carries_email() {
    let app = create_test_app().await;

    let err = accounts::find_by_email(&app.pool, "missing@example.com")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing@example.com"));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let app = create_test_app().await;
    app.register_and_token("test@example.com", "Password123")
        .await;

    let account = accounts::find_by_email(&app.pool, "test@example.com")
        .await
        .unwrap();
    assert_ne!(account.password_hash, "Password123");
    assert!(account.password_hash.starts_with("$argon2"));
    assert!(
        eventboard::auth::password::verify_password("Password123", &account.password_hash)
            .unwrap()
    );
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = create_test_app().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}
