//! Repository contracts shared by every storage variant.
//!
//! # Responsibility
//! - Define CRUD, bulk and lookup operations over one entity kind.
//! - Define the searchable capability and its per-entity hooks.
//!
//! # Invariants
//! - `update`/`delete` on an unknown id return `RepoError::NotFound`.
//! - `find_by_id` reports absence as `Ok(None)`, never as an error.
//! - Only fields listed in `Searchable::SORTABLE_FIELDS` may drive ordering.

use crate::db::DbError;
use crate::model::entity::Entity;
use crate::repo::search::{SearchFilter, SearchParams, SearchResult, SortDirection};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and lookup operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No stored entity matches the identifier.
    NotFound { entity: &'static str, id: String },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Builds a not-found error for one entity kind.
    pub fn not_found<E: Entity>(id: &E::Id) -> Self {
        Self::NotFound {
            entity: E::ENTITY_NAME,
            id: id.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} Not Found using ID {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "repository requires column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Partition of requested ids into stored and unknown ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsById<Id> {
    pub exists: Vec<Id>,
    pub not_exists: Vec<Id>,
}

impl<Id> Default for ExistsById<Id> {
    fn default() -> Self {
        Self {
            exists: Vec::new(),
            not_exists: Vec::new(),
        }
    }
}

/// Repository interface for one entity kind.
pub trait Repository<E: Entity> {
    fn insert(&self, entity: &E) -> RepoResult<()>;
    /// Inserts many entities; atomicity depends on the storage variant.
    fn bulk_insert(&self, entities: &[E]) -> RepoResult<()>;
    fn update(&self, entity: &E) -> RepoResult<()>;
    fn delete(&self, id: &E::Id) -> RepoResult<()>;
    fn find_by_id(&self, id: &E::Id) -> RepoResult<Option<E>>;
    fn find_all(&self) -> RepoResult<Vec<E>>;
    /// Returns stored entities among `ids`; unknown ids are skipped.
    fn find_by_ids(&self, ids: &[E::Id]) -> RepoResult<Vec<E>>;
    /// Splits `ids` into stored and unknown, keeping request order.
    fn exists_by_id(&self, ids: &[E::Id]) -> RepoResult<ExistsById<E::Id>>;
}

/// Repository that also supports filtered, sorted, paginated search.
pub trait SearchableRepository<E: Searchable>: Repository<E> {
    fn search(&self, params: &SearchParams<E::Filter>) -> RepoResult<SearchResult<E>>;
}

/// Comparable projection of one entity field.
///
/// Values of one field always share a variant, so the derived ordering is
/// numeric, lexicographic or chronological as appropriate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Per-entity search hooks shared by all repository variants.
pub trait Searchable: Entity + Clone {
    type Filter: SearchFilter;

    /// Allow-list of field names accepted as sort keys.
    const SORTABLE_FIELDS: &'static [&'static str];

    /// Order applied when the request names no allow-listed field.
    ///
    /// `None` keeps storage order.
    fn default_sort() -> Option<(&'static str, SortDirection)> {
        None
    }

    fn is_sortable(field: &str) -> bool {
        Self::SORTABLE_FIELDS.contains(&field)
    }

    /// In-memory filter predicate.
    fn matches_filter(&self, filter: &Self::Filter) -> bool;

    /// In-memory sort key for an allow-listed field.
    fn sort_value(&self, field: &str) -> Option<SortValue>;
}
