//! Category use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for categories.
//! - Map entities to plain `CategoryOutput` records.
//!
//! # Invariants
//! - Updates apply every requested change before persisting, and persist
//!   nothing when any change fails validation.

use crate::model::category::{Category, CategoryCreateCommand};
use crate::model::id::CategoryId;
use crate::model::validation::ValidationErrors;
use crate::repo::category_repo::{CategoryFilter, CategoryRepository, CategorySearchParams};
use crate::repo::repository::{RepoError, Repository, SearchableRepository};
use crate::repo::search::SearchParamsInput;
use crate::service::{PaginationOutput, ServiceResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

/// Input for the create use-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for the update use-case; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCategoryInput {
    pub id: String,
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Raw list input; normalized into `CategorySearchParams`.
pub type ListCategoriesInput = SearchParamsInput<CategoryFilter>;

/// Plain category record returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOutput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryOutput {
    fn from(entity: &Category) -> Self {
        Self {
            id: entity.category_id().to_string(),
            name: entity.name().to_string(),
            description: entity.description().map(str::to_string),
            is_active: entity.is_active(),
            created_at: entity.created_at(),
        }
    }
}

/// Category service facade over repository implementations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn create(&self, input: CreateCategoryInput) -> ServiceResult<CategoryOutput> {
        let category = Category::create(CategoryCreateCommand {
            name: input.name,
            description: input.description,
            is_active: input.is_active,
        })?;
        self.repo.insert(&category)?;

        info!(
            "event=category_create module=service status=ok category_id={}",
            category.category_id()
        );
        Ok(CategoryOutput::from(&category))
    }

    pub fn update(&self, input: UpdateCategoryInput) -> ServiceResult<CategoryOutput> {
        let category_id = CategoryId::parse(&input.id)?;
        let mut category = self
            .repo
            .find_by_id(&category_id)?
            .ok_or_else(|| RepoError::not_found::<Category>(&category_id))?;

        let mut errors = ValidationErrors::new();
        if let Some(name) = input.name {
            if let Err(err) = category.change_name(name) {
                errors.merge(err);
            }
        }
        if let Some(description) = input.description {
            if let Err(err) = category.change_description(description) {
                errors.merge(err);
            }
        }
        match input.is_active {
            Some(true) => category.activate(),
            Some(false) => category.deactivate(),
            None => {}
        }
        errors.into_result()?;

        self.repo.update(&category)?;
        info!("event=category_update module=service status=ok category_id={category_id}");
        Ok(CategoryOutput::from(&category))
    }

    pub fn get(&self, id: &str) -> ServiceResult<CategoryOutput> {
        let category_id = CategoryId::parse(id)?;
        let category = self
            .repo
            .find_by_id(&category_id)?
            .ok_or_else(|| RepoError::not_found::<Category>(&category_id))?;
        Ok(CategoryOutput::from(&category))
    }

    pub fn list(&self, input: ListCategoriesInput) -> ServiceResult<PaginationOutput<CategoryOutput>> {
        let params = CategorySearchParams::from_input(input);
        let result = self.repo.search(&params)?;
        debug!(
            "event=category_list module=service status=ok page={} per_page={} total={}",
            result.current_page(),
            result.per_page(),
            result.total()
        );
        Ok(PaginationOutput::from_result(result, |category| {
            CategoryOutput::from(&category)
        }))
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let category_id = CategoryId::parse(id)?;
        self.repo.delete(&category_id)?;
        info!("event=category_delete module=service status=ok category_id={category_id}");
        Ok(())
    }
}
