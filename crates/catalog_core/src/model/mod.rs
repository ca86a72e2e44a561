//! Catalog domain model.
//!
//! # Responsibility
//! - Define identifier value objects, entities and validation errors.
//! - Keep entity construction and mutation behind validating methods.
//!
//! # Invariants
//! - Every entity is identified by a stable, typed UUID identifier.
//! - Entity equality of identity never depends on attribute values.

pub mod cast_member;
pub mod category;
pub mod entity;
pub mod id;
pub mod validation;

use chrono::{DateTime, Utc};

/// Current time truncated to milliseconds, the precision kept by storage.
pub(crate) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
