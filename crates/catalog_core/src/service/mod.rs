//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate entity behaviour and repository calls per use-case.
//! - Exchange plain input/output records with outer layers.
//!
//! # Invariants
//! - Validation and not-found failures cross this boundary as typed
//!   `ServiceError` variants; transport mapping belongs to callers.
//! - Services stay storage-agnostic.

pub mod cast_member_service;
pub mod category_service;

use crate::model::id::InvalidIdError;
use crate::model::validation::ValidationErrors;
use crate::repo::repository::RepoError;
use crate::repo::search::SearchResult;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Identifier text is not a valid UUID.
    InvalidId(InvalidIdError),
    /// Entity attributes violate domain rules.
    Validation(ValidationErrors),
    /// Target entity does not exist.
    NotFound { entity: &'static str, id: String },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} Not Found using ID {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

impl From<InvalidIdError> for ServiceError {
    fn from(value: InvalidIdError) -> Self {
        Self::InvalidId(value)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Paginated list envelope returned by list use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationOutput<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
}

impl<T> PaginationOutput<T> {
    /// Maps a repository result page into output records.
    pub fn from_result<E>(result: SearchResult<E>, to_output: impl FnMut(E) -> T) -> Self {
        let result = result.map_items(to_output);
        Self {
            total: result.total(),
            current_page: result.current_page(),
            last_page: result.last_page(),
            per_page: result.per_page(),
            items: result.into_items(),
        }
    }
}
