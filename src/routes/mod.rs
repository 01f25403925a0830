use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

mod auth;
mod events;
mod health;
mod index;

use crate::middleware::auth_middleware;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub pool: SqlitePool,
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})))
}

pub fn router(state: AppState) -> Router {
    // Creation and update require an authenticated account
    let protected_routes = Router::new()
        .route("/api/events", post(events::create))
        .route("/api/events/{id}", put(events::update))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/api", get(index::index))
                .route("/api/accounts", post(auth::register))
                .route("/api/auth/token", post(auth::token))
                .route("/api/events", get(events::list))
                .route("/api/events/{id}", get(events::find))
                .merge(protected_routes)
                .fallback(fallback)
                .with_state(state),
        )
        .layer(TraceLayer::new_for_http())
}
