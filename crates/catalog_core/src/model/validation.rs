//! Field-level validation errors for entity factories and mutators.
//!
//! # Invariants
//! - Field order is deterministic (sorted by field name).
//! - One field never carries the same message twice.

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length accepted for entity names.
pub const NAME_MAX_CHARS: usize = 255;

/// Collected validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        let messages = self.fields.entry(field.into()).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    /// Copies all messages from `other` into this collection.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            for message in messages {
                self.add(field.clone(), message);
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Messages recorded for one field, empty when the field is valid.
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Converts the collection into `Err(self)` when any message exists.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity validation failed")?;
        let mut separator = ": ";
        for (field, messages) in &self.fields {
            write!(f, "{separator}{field}: {}", messages.join(", "))?;
            separator = "; ";
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Applies the shared name rules used by every catalog entity.
pub(crate) fn validate_name(name: &str, errors: &mut ValidationErrors) {
    if name.is_empty() {
        errors.add("name", "name should not be empty");
    }
    if name.chars().count() > NAME_MAX_CHARS {
        errors.add(
            "name",
            format!("name must be shorter than or equal to {NAME_MAX_CHARS} characters"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_name, ValidationErrors};

    #[test]
    fn add_deduplicates_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "name should not be empty");
        errors.add("name", "name should not be empty");
        assert_eq!(errors.messages("name"), ["name should not be empty"]);
        assert!(errors.messages("description").is_empty());
    }

    #[test]
    fn merge_and_display_keep_field_order() {
        let mut left = ValidationErrors::new();
        left.add("type", "Invalid cast member type: 9");
        let mut right = ValidationErrors::new();
        right.add("name", "name should not be empty");
        left.merge(right);

        let fields: Vec<&str> = left.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, ["name", "type"]);
        assert_eq!(
            left.to_string(),
            "entity validation failed: name: name should not be empty; type: Invalid cast member type: 9"
        );
    }

    #[test]
    fn validate_name_checks_empty_and_length() {
        let mut errors = ValidationErrors::new();
        validate_name("Movie", &mut errors);
        assert!(errors.into_result().is_ok());

        let mut errors = ValidationErrors::new();
        validate_name(&"t".repeat(256), &mut errors);
        assert_eq!(
            errors.messages("name"),
            ["name must be shorter than or equal to 255 characters"]
        );
    }
}
