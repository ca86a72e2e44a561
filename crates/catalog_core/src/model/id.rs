//! Identifier value objects.
//!
//! # Responsibility
//! - Give every entity kind its own strongly-typed UUID identifier.
//! - Validate textual identifiers at the boundary where they enter core.
//!
//! # Invariants
//! - A constructed identifier is always a well-formed, non-nil UUID.
//! - Two identifiers are equal iff their UUID values are equal.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when identifier text is not a usable UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIdError {
    /// Raw text that failed validation.
    pub value: String,
}

impl Display for InvalidIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID must be a valid UUID, got `{}`", self.value)
    }
}

impl Error for InvalidIdError {}

/// Identifier of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

/// Identifier of a cast member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CastMemberId(Uuid);

macro_rules! impl_uuid_id {
    ($t:ty) => {
        impl $t {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID, rejecting the nil value.
            pub fn from_uuid(uuid: Uuid) -> Result<Self, InvalidIdError> {
                if uuid.is_nil() {
                    return Err(InvalidIdError {
                        value: uuid.to_string(),
                    });
                }
                Ok(Self(uuid))
            }

            /// Parses identifier text.
            pub fn parse(value: &str) -> Result<Self, InvalidIdError> {
                let uuid = Uuid::parse_str(value.trim()).map_err(|_| InvalidIdError {
                    value: value.to_string(),
                })?;
                Self::from_uuid(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $t {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_uuid_id!(CategoryId);
impl_uuid_id!(CastMemberId);
