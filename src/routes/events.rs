use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::accounts;
use crate::error::AppError;
use crate::events::{self, Event, EventInput};
use crate::hal::{self, Link, Links};
use crate::middleware::CurrentAccount;
use crate::routes::AppState;

/// Owning account as exposed on event representations (never the hash)
#[derive(Debug, Clone, Serialize)]
pub struct ManagerRepr {
    pub id: i64,
    pub email: String,
}

/// A single event plus its hypermedia links
#[derive(Debug, Serialize)]
pub struct EventResource {
    #[serde(flatten)]
    pub event: Event,
    pub manager: ManagerRepr,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl EventResource {
    fn new(event: Event, manager: ManagerRepr) -> Self {
        let links = hal::event_links(event.id);
        Self {
            event,
            manager,
            links,
        }
    }
}

async fn manager_repr(
    pool: &SqlitePool,
    cache: &mut HashMap<i64, String>,
    manager_id: i64,
) -> Result<ManagerRepr, AppError> {
    if let Some(email) = cache.get(&manager_id) {
        return Ok(ManagerRepr {
            id: manager_id,
            email: email.clone(),
        });
    }

    let account = accounts::find_by_id(pool, manager_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("event manager {manager_id} missing")))?;

    cache.insert(manager_id, account.email.clone());
    Ok(ManagerRepr {
        id: manager_id,
        email: account.email,
    })
}

/// POST /api/events - Create an event from validated client input
#[tracing::instrument(skip(state, current, payload), fields(account_id = current.id))]
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;

    let issues = events::validate_input(&input);
    if !issues.is_empty() {
        return Err(AppError::Validation(issues));
    }

    let event = Event::from_input(input, current.id);
    let stored = events::insert_event(&state.pool, &event).await?;

    tracing::info!(event_id = stored.id, "event created");

    let location = format!("/api/events/{}", stored.id);
    let manager = ManagerRepr {
        id: current.id,
        email: current.email,
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(EventResource::new(stored, manager)),
    ))
}

/// GET /api/events/{id}
pub async fn find(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EventResource>, AppError> {
    let event = events::find_event(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut cache = HashMap::new();
    let manager = manager_repr(&state.pool, &mut cache, event.manager_id).await?;

    Ok(Json(EventResource::new(event, manager)))
}

/// PUT /api/events/{id} - Update an event
///
/// Only the owning manager or an ADMIN may update; derived fields are
/// recomputed from the new input before persisting.
#[tracing::instrument(skip(state, current, payload), fields(account_id = current.id))]
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i64>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<Json<EventResource>, AppError> {
    let Json(input) = payload?;

    let mut event = events::find_event(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !event.is_managed_by(current.id) && !current.is_admin() {
        return Err(AppError::Forbidden);
    }

    let issues = events::validate_input(&input);
    if !issues.is_empty() {
        return Err(AppError::Validation(issues));
    }

    event.apply_input(input);
    let stored = events::update_event(&state.pool, &event).await?;

    let mut cache = HashMap::new();
    let manager = manager_repr(&state.pool, &mut cache, stored.manager_id).await?;

    Ok(Json(EventResource::new(stored, manager)))
}

fn default_size() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

/// GET /api/events - Paged listing, 0-based page index
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.max(0);
    let size = query.size.clamp(1, 100);

    let result = events::list_events(&state.pool, page, size).await?;
    let total_pages = if result.total_elements == 0 {
        0
    } else {
        (result.total_elements + size - 1) / size
    };

    let mut cache = HashMap::new();
    let mut resources = Vec::with_capacity(result.events.len());
    for event in result.events {
        let manager = manager_repr(&state.pool, &mut cache, event.manager_id).await?;
        resources.push(EventResource::new(event, manager));
    }

    let page_href = |p: i64| Link::new(format!("/api/events?page={p}&size={size}"));
    let last_page = (total_pages - 1).max(0);

    let mut links = Links::new();
    links.insert("self", page_href(page));
    links.insert("first", page_href(0));
    links.insert("last", page_href(last_page));
    if page > 0 {
        links.insert("prev", page_href(page - 1));
    }
    if page < last_page {
        links.insert("next", page_href(page + 1));
    }
    links.insert("profile", Link::new(hal::PROFILE_HREF));

    Ok(Json(json!({
        "_embedded": { "events": resources },
        "_links": links,
        "page": {
            "size": size,
            "totalElements": result.total_elements,
            "totalPages": total_pages,
            "number": page,
        },
    })))
}
