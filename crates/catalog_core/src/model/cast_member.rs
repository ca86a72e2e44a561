//! Cast member domain model.
//!
//! # Responsibility
//! - Define the cast member record and its role value object.
//!
//! # Invariants
//! - `CastMemberType` only holds known role codes (`1` director, `2` actor).
//! - A constructed `CastMember` always satisfies `CastMember::validate`.

use super::entity::Entity;
use super::id::CastMemberId;
use super::now_millis;
use super::validation::{validate_name, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Role of a cast member in a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CastMemberType {
    Director,
    Actor,
}

/// Error returned for unknown role codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCastMemberTypeError(pub i64);

impl Display for InvalidCastMemberTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid cast member type: {}", self.0)
    }
}

impl Error for InvalidCastMemberTypeError {}

impl CastMemberType {
    /// Stable numeric code used by storage and external records.
    pub fn code(self) -> i64 {
        match self {
            Self::Director => 1,
            Self::Actor => 2,
        }
    }

    pub fn try_from_code(code: i64) -> Result<Self, InvalidCastMemberTypeError> {
        match code {
            1 => Ok(Self::Director),
            2 => Ok(Self::Actor),
            other => Err(InvalidCastMemberTypeError(other)),
        }
    }
}

impl Serialize for CastMemberType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

/// Person credited in catalog productions; `==` compares identity only.
#[derive(Debug, Clone, Serialize)]
pub struct CastMember {
    cast_member_id: CastMemberId,
    name: String,
    #[serde(rename = "type")]
    member_type: CastMemberType,
    created_at: DateTime<Utc>,
}

/// Input for `CastMember::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMemberCreateCommand {
    pub name: String,
    pub member_type: CastMemberType,
}

/// Full persisted state, used to rebuild a cast member read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMemberSnapshot {
    pub cast_member_id: CastMemberId,
    pub name: String,
    pub member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
}

impl CastMember {
    pub fn create(command: CastMemberCreateCommand) -> Result<Self, ValidationErrors> {
        let cast_member = Self {
            cast_member_id: CastMemberId::new(),
            name: command.name,
            member_type: command.member_type,
            created_at: now_millis(),
        };
        cast_member.validate()?;
        Ok(cast_member)
    }

    pub fn restore(snapshot: CastMemberSnapshot) -> Result<Self, ValidationErrors> {
        let cast_member = Self {
            cast_member_id: snapshot.cast_member_id,
            name: snapshot.name,
            member_type: snapshot.member_type,
            created_at: snapshot.created_at,
        };
        cast_member.validate()?;
        Ok(cast_member)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&self.name, &mut errors);
        errors.into_result()
    }

    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), ValidationErrors> {
        let previous = std::mem::replace(&mut self.name, name.into());
        if let Err(errors) = self.validate() {
            self.name = previous;
            return Err(errors);
        }
        Ok(())
    }

    pub fn change_type(&mut self, member_type: CastMemberType) {
        self.member_type = member_type;
    }

    pub fn cast_member_id(&self) -> CastMemberId {
        self.cast_member_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_type(&self) -> CastMemberType {
        self.member_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn snapshot(&self) -> CastMemberSnapshot {
        CastMemberSnapshot {
            cast_member_id: self.cast_member_id,
            name: self.name.clone(),
            member_type: self.member_type,
            created_at: self.created_at,
        }
    }
}

impl PartialEq for CastMember {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for CastMember {}

impl Entity for CastMember {
    type Id = CastMemberId;
    const ENTITY_NAME: &'static str = "CastMember";

    fn entity_id(&self) -> &Self::Id {
        &self.cast_member_id
    }
}
