//! Shared helpers for driving the router in integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub async fn setup_test_db() -> SqlitePool {
    let pool = eventboard::db::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database");
    eventboard::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub async fn create_test_app() -> TestApp {
    let pool = setup_test_db().await;
    let router = eventboard::create_app(pool.clone());
    TestApp { router, pool }
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: Value,
        token: Option<&str>,
    ) -> Response<Body> {
        self.request(json_request(Method::POST, uri, body, token))
            .await
    }

    pub async fn put_json(&self, uri: &str, body: Value, token: Option<&str>) -> Response<Body> {
        self.request(json_request(Method::PUT, uri, body, token))
            .await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Register an account and obtain a Bearer token for it
    pub async fn register_and_token(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/api/accounts",
                serde_json::json!({"email": email, "password": password}),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        self.token_for(email, password).await
    }

    pub async fn token_for(&self, email: &str, password: &str) -> String {
        let form = serde_urlencoded::to_string([
            ("grant_type", "password"),
            ("username", email),
            ("password", password),
        ])
        .unwrap();

        let response = self
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
        body["access_token"].as_str().unwrap().to_string()
    }
}

pub fn json_request(method: Method, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

/// The canonical well-formed creation payload
pub fn valid_event_payload() -> Value {
    serde_json::json!({
        "name": "Spring",
        "description": "Rest API",
        "beginEnrollmentDateTime": "2020-01-27T16:03:00",
        "closeEnrollmentDateTime": "2020-01-28T12:01:00",
        "beginEventDateTime": "2020-01-27T12:01:00",
        "endEventDateTime": "2020-01-28T12:01:00",
        "basePrice": 100,
        "maxPrice": 200,
        "limitOfEnrollment": 100,
        "location": "강남역"
    })
}
