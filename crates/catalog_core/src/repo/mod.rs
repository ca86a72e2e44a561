//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage-agnostic repository and search contracts.
//! - Provide an in-memory variant and SQLite-backed variants per entity.
//!
//! # Invariants
//! - Callers depend on `Repository`/`SearchableRepository`, never on a
//!   concrete variant.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod cast_member_repo;
pub mod category_repo;
pub mod in_memory;
pub mod repository;
pub mod search;
mod sqlite;
