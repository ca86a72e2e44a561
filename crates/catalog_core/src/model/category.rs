//! Category domain model.
//!
//! # Responsibility
//! - Define the category record and its behaviour methods.
//! - Apply creation defaults (`is_active = true`, `created_at = now`).
//!
//! # Invariants
//! - A constructed `Category` always satisfies `Category::validate`.
//! - Every mutator that touches validated fields re-runs validation and
//!   leaves the entity unchanged when it fails.

use super::entity::Entity;
use super::id::CategoryId;
use super::now_millis;
use super::validation::{validate_name, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Catalog category, e.g. "Movie" or "Documentary".
///
/// `==` compares identity only; compare [`Category::snapshot`] values to
/// check attributes.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    category_id: CategoryId,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

/// Input for `Category::create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCreateCommand {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `true` when absent.
    pub is_active: Option<bool>,
}

impl CategoryCreateCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Full persisted state, used to rebuild a category read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySnapshot {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category with a generated id and default values.
    pub fn create(command: CategoryCreateCommand) -> Result<Self, ValidationErrors> {
        let category = Self {
            category_id: CategoryId::new(),
            name: command.name,
            description: command.description,
            is_active: command.is_active.unwrap_or(true),
            created_at: now_millis(),
        };
        category.validate()?;
        Ok(category)
    }

    /// Rebuilds a category from persisted state.
    pub fn restore(snapshot: CategorySnapshot) -> Result<Self, ValidationErrors> {
        let category = Self {
            category_id: snapshot.category_id,
            name: snapshot.name,
            description: snapshot.description,
            is_active: snapshot.is_active,
            created_at: snapshot.created_at,
        };
        category.validate()?;
        Ok(category)
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

    pub fn change_description(
        &mut self,
        description: Option<String>,
    ) -> Result<(), ValidationErrors> {
        let previous = std::mem::replace(&mut self.description, description);
        if let Err(errors) = self.validate() {
            self.description = previous;
            return Err(errors);
        }
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current attribute values.
    pub fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            category_id: self.category_id,
            name: self.name.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for Category {}

impl Entity for Category {
    type Id = CategoryId;
    const ENTITY_NAME: &'static str = "Category";

    fn entity_id(&self) -> &Self::Id {
        &self.category_id
    }
}
