//! Core domain logic for the video catalog.
//! Categories and cast members, their validation rules, and the searchable
//! repositories (in-memory and SQLite) behind the catalog use-cases.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::cast_member::{CastMember, CastMemberType, InvalidCastMemberTypeError};
pub use model::category::Category;
pub use model::entity::Entity;
pub use model::id::{CastMemberId, CategoryId, InvalidIdError};
pub use model::validation::ValidationErrors;
pub use repo::cast_member_repo::{
    CastMemberFilter, CastMemberInMemoryRepository, CastMemberRepository,
    SqliteCastMemberRepository,
};
pub use repo::category_repo::{
    CategoryFilter, CategoryInMemoryRepository, CategoryRepository, SqliteCategoryRepository,
};
pub use repo::repository::{
    ExistsById, RepoError, RepoResult, Repository, Searchable, SearchableRepository,
};
pub use repo::search::{SearchParams, SearchParamsInput, SearchResult, SortDirection};
pub use service::cast_member_service::CastMemberService;
pub use service::category_service::CategoryService;
pub use service::{PaginationOutput, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
