//! Hypermedia response shaping
//!
//! Link construction lives here, outside the domain types, so that
//! validation and persistence never depend on route layout.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single hypermedia link
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Ordered map of relation name to link (BTreeMap keeps output stable)
pub type Links = BTreeMap<&'static str, Link>;

/// Location of the generated API documentation
pub const PROFILE_HREF: &str = "/docs/index.html#resources-events";

pub fn event_links(id: i64) -> Links {
    let mut links = Links::new();
    links.insert("self", Link::new(format!("/api/events/{id}")));
    links.insert("query-events", Link::new("/api/events"));
    links.insert("update-event", Link::new(format!("/api/events/{id}")));
    links.insert("profile", Link::new(PROFILE_HREF));
    links
}

pub fn index_links() -> Links {
    let mut links = Links::new();
    links.insert("events", Link::new("/api/events"));
    links.insert("profile", Link::new(PROFILE_HREF));
    links
}

/// Links attached to validation-error responses, pointing back to the index
pub fn error_links() -> Links {
    let mut links = Links::new();
    links.insert("index", Link::new("/api"));
    links
}
