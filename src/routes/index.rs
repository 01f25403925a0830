use axum::{response::IntoResponse, Json};
use serde_json::json;

use crate::hal;

/// GET /api - Index resource; entry point advertising the API's relations
pub async fn index() -> impl IntoResponse {
    Json(json!({ "_links": hal::index_links() }))
}
