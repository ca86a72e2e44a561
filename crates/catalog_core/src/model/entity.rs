//! Entity trait: identity that survives attribute changes.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Minimal interface shared by all catalog entities.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Copy + Eq + Hash + Debug + Display;

    /// Human-readable entity kind, used in not-found reporting.
    const ENTITY_NAME: &'static str;

    /// Returns the entity identifier.
    fn entity_id(&self) -> &Self::Id;

    /// Returns whether both values denote the same entity, regardless of
    /// their current attribute values.
    fn same_identity(&self, other: &Self) -> bool {
        self.entity_id() == other.entity_id()
    }
}
