//! sqlx persistence for events
//!
//! Each function is a single statement, so a failed validation never
//! leaves a partial row behind and concurrent creations stay independent.

use sqlx::SqlitePool;

use super::Event;

const SELECT_COLUMNS: &str = "id, name, description, location, base_price, max_price, \
     limit_of_enrollment, begin_enrollment_date_time, close_enrollment_date_time, \
     begin_event_date_time, end_event_date_time, offline, free, status, manager_id";

/// One page of events plus the total row count
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total_elements: i64,
}

/// Insert a new event and return it with its storage-assigned id
pub async fn insert_event(pool: &SqlitePool, event: &Event) -> Result<Event, sqlx::Error> {
    let query = format!(
        "INSERT INTO events (name, description, location, base_price, max_price, \
         limit_of_enrollment, begin_enrollment_date_time, close_enrollment_date_time, \
         begin_event_date_time, end_event_date_time, offline, free, status, manager_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) \
         RETURNING {SELECT_COLUMNS}"
    );

    sqlx::query_as::<_, Event>(&query)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.base_price)
        .bind(event.max_price)
        .bind(event.limit_of_enrollment)
        .bind(event.begin_enrollment_date_time)
        .bind(event.close_enrollment_date_time)
        .bind(event.begin_event_date_time)
        .bind(event.end_event_date_time)
        .bind(event.offline)
        .bind(event.free)
        .bind(event.status)
        .bind(event.manager_id)
        .fetch_one(pool)
        .await
}

pub async fn find_event(pool: &SqlitePool, id: i64) -> Result<Option<Event>, sqlx::Error> {
    let query = format!("SELECT {SELECT_COLUMNS} FROM events WHERE id = ?1");

    sqlx::query_as::<_, Event>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Persist the mutable fields of an existing event
pub async fn update_event(pool: &SqlitePool, event: &Event) -> Result<Event, sqlx::Error> {
    let query = format!(
        "UPDATE events SET name = ?1, description = ?2, location = ?3, base_price = ?4, \
         max_price = ?5, limit_of_enrollment = ?6, begin_enrollment_date_time = ?7, \
         close_enrollment_date_time = ?8, begin_event_date_time = ?9, \
         end_event_date_time = ?10, offline = ?11, free = ?12 \
         WHERE id = ?13 \
         RETURNING {SELECT_COLUMNS}"
    );

    sqlx::query_as::<_, Event>(&query)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.base_price)
        .bind(event.max_price)
        .bind(event.limit_of_enrollment)
        .bind(event.begin_enrollment_date_time)
        .bind(event.close_enrollment_date_time)
        .bind(event.begin_event_date_time)
        .bind(event.end_event_date_time)
        .bind(event.offline)
        .bind(event.free)
        .bind(event.id)
        .fetch_one(pool)
        .await
}

/// Fetch one 0-based page ordered by id
pub async fn list_events(
    pool: &SqlitePool,
    page: i64,
    size: i64,
) -> Result<EventPage, sqlx::Error> {
    let total_elements: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;

    // An offset past i64 range cannot address any row; short-circuit to
    // an empty page instead of overflowing.
    let events = match page.checked_mul(size) {
        Some(offset) if offset < total_elements.0 => {
            let query =
                format!("SELECT {SELECT_COLUMNS} FROM events ORDER BY id LIMIT ?1 OFFSET ?2");
            sqlx::query_as::<_, Event>(&query)
                .bind(size)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        _ => Vec::new(),
    };

    Ok(EventPage {
        events,
        total_elements: total_elements.0,
    })
}
