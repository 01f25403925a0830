//! Event domain: entity, client-facing input shape, and validation rules

mod store;
mod validation;

pub use store::{find_event, insert_event, list_events, update_event, EventPage};
pub use validation::{validate_input, ValidationIssue};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle state of an event's visibility
///
/// Only the initial DRAFT state is assigned here; transitions belong to an
/// enrollment workflow outside this scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum EventStatus {
    #[serde(rename = "DRAFT")]
    #[sqlx(rename = "DRAFT")]
    Draft,
    #[serde(rename = "PUBLISHED")]
    #[sqlx(rename = "PUBLISHED")]
    Published,
    #[serde(rename = "BEGAN_ENROLLMENT")]
    #[sqlx(rename = "BEGAN_ENROLLMENT")]
    BeganEnrollment,
}

/// The persisted event entity
///
/// `free` and `offline` are caches of a derived condition and are
/// recomputed through [`Event::update_derived`]; they are never taken
/// from client input.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub offline: bool,
    pub free: bool,
    #[serde(rename = "eventStatus")]
    pub status: EventStatus,
    #[serde(skip_serializing)]
    pub manager_id: i64,
}

impl Event {
    /// Build a fresh entity from validated client input
    ///
    /// Server-assigned fields (id, status, derived flags, owner) never come
    /// from the wire: the id is a placeholder until the store assigns one,
    /// status starts at DRAFT, and the derived flags are computed here.
    pub fn from_input(input: EventInput, manager_id: i64) -> Self {
        let mut event = Self {
            id: 0,
            name: input.name,
            description: input.description,
            location: input.location,
            base_price: input.base_price,
            max_price: input.max_price,
            limit_of_enrollment: input.limit_of_enrollment,
            begin_enrollment_date_time: input.begin_enrollment_date_time,
            close_enrollment_date_time: input.close_enrollment_date_time,
            begin_event_date_time: input.begin_event_date_time,
            end_event_date_time: input.end_event_date_time,
            offline: false,
            free: false,
            status: EventStatus::Draft,
            manager_id,
        };
        event.update_derived();
        event
    }

    /// Overwrite the client-writable fields from new input
    ///
    /// Identifier, status and owner are untouched; derived flags are
    /// recomputed afterwards.
    pub fn apply_input(&mut self, input: EventInput) {
        self.name = input.name;
        self.description = input.description;
        self.location = input.location;
        self.base_price = input.base_price;
        self.max_price = input.max_price;
        self.limit_of_enrollment = input.limit_of_enrollment;
        self.begin_enrollment_date_time = input.begin_enrollment_date_time;
        self.close_enrollment_date_time = input.close_enrollment_date_time;
        self.begin_event_date_time = input.begin_event_date_time;
        self.end_event_date_time = input.end_event_date_time;
        self.update_derived();
    }

    /// Recompute the derived `free` and `offline` flags
    ///
    /// Pure function of the current field values; idempotent. Must run
    /// after every change to the price or location fields.
    pub fn update_derived(&mut self) {
        self.free = self.base_price == 0 && self.max_price == 0;
        self.offline = self
            .location
            .as_deref()
            .map(|loc| !loc.trim().is_empty())
            .unwrap_or(false);
    }

    pub fn is_managed_by(&self, account_id: i64) -> bool {
        self.manager_id == account_id
    }
}

/// Client-writable fields for creating or updating an event
///
/// Unknown fields are rejected outright, so a payload carrying `id`,
/// `eventStatus`, `free`, `offline` or `manager` fails deserialization
/// instead of silently spoofing server-assigned state.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub location: Option<String>,
    #[validate(range(min = 0, message = "basePrice must not be negative"))]
    pub base_price: i32,
    #[validate(range(min = 0, message = "maxPrice must not be negative"))]
    pub max_price: i32,
    #[validate(range(min = 0, message = "limitOfEnrollment must not be negative"))]
    pub limit_of_enrollment: i32,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
}
