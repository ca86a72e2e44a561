//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Bind `Category` to the searchable repository contract.
//! - Keep category SQL inside the persistence boundary.
//!
//! # Invariants
//! - Filter is a case-insensitive substring match on `name`.
//! - Sortable fields: `name`, `created_at`; default order `created_at DESC`.
//! - `total` comes from a `COUNT(*)` over the same `WHERE` as the page.

use crate::model::category::{Category, CategorySnapshot};
use crate::model::entity::Entity;
use crate::model::id::CategoryId;
use crate::repo::in_memory::InMemoryRepository;
use crate::repo::repository::{
    ExistsById, RepoError, RepoResult, Repository, Searchable, SearchableRepository, SortValue,
};
use crate::repo::search::{fold_name, SearchParams, SearchResult, SortDirection};
use crate::repo::sqlite::{
    bool_to_int, contains_pattern, ensure_table_ready, order_by_clause, parse_bool,
    parse_timestamp, placeholders, timestamp_to_db,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;

/// Category filter: substring of the category name.
pub type CategoryFilter = String;
pub type CategorySearchParams = SearchParams<CategoryFilter>;
pub type CategorySearchResult = SearchResult<Category>;
pub type CategoryInMemoryRepository = InMemoryRepository<Category>;

/// Searchable repository for categories.
pub trait CategoryRepository: SearchableRepository<Category> {}

impl<T: SearchableRepository<Category>> CategoryRepository for T {}

impl Searchable for Category {
    type Filter = CategoryFilter;
    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "created_at"];

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("created_at", SortDirection::Desc))
    }

    fn matches_filter(&self, filter: &Self::Filter) -> bool {
        fold_name(self.name()).contains(&fold_name(filter))
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name().to_string())),
            "created_at" => Some(SortValue::Timestamp(self.created_at())),
            _ => None,
        }
    }
}

const CATEGORY_TABLE: &str = "categories";
const CATEGORY_COLUMNS: &[&str] = &[
    "category_id",
    "name",
    "name_search",
    "description",
    "is_active",
    "created_at",
];
const CATEGORY_SELECT_SQL: &str = "SELECT
    category_id,
    name,
    description,
    is_active,
    created_at
FROM categories";

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, CATEGORY_TABLE, CATEGORY_COLUMNS)?;
        Ok(Self { conn })
    }

    fn insert_with(conn: &Connection, entity: &Category) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO categories (
                category_id,
                name,
                name_search,
                description,
                is_active,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entity.category_id().to_string(),
                entity.name(),
                fold_name(entity.name()),
                entity.description(),
                bool_to_int(entity.is_active()),
                timestamp_to_db(entity.created_at()),
            ],
        )?;
        Ok(())
    }

    fn query_categories(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_category_row(row)?);
        }
        Ok(items)
    }
}

impl Repository<Category> for SqliteCategoryRepository<'_> {
    fn insert(&self, entity: &Category) -> RepoResult<()> {
        Self::insert_with(self.conn, entity)
    }

    fn bulk_insert(&self, entities: &[Category]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for entity in entities {
            Self::insert_with(&tx, entity)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update(&self, entity: &Category) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?2,
                name_search = ?3,
                description = ?4,
                is_active = ?5,
                created_at = ?6
             WHERE category_id = ?1;",
            params![
                entity.category_id().to_string(),
                entity.name(),
                fold_name(entity.name()),
                entity.description(),
                bool_to_int(entity.is_active()),
                timestamp_to_db(entity.created_at()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found::<Category>(entity.entity_id()));
        }
        Ok(())
    }

    fn delete(&self, id: &CategoryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM categories WHERE category_id = ?1;",
            [id.to_string()],
        )?;

        if changed != 1 {
            return Err(RepoError::not_found::<Category>(id));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &CategoryId) -> RepoResult<Option<Category>> {
        let mut items = self.query_categories(
            &format!("{CATEGORY_SELECT_SQL} WHERE category_id = ?1;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(items.pop())
    }

    fn find_all(&self) -> RepoResult<Vec<Category>> {
        self.query_categories(&format!("{CATEGORY_SELECT_SQL} ORDER BY rowid ASC;"), Vec::new())
    }

    fn find_by_ids(&self, ids: &[CategoryId]) -> RepoResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{CATEGORY_SELECT_SQL} WHERE category_id IN ({}) ORDER BY rowid ASC;",
            placeholders(ids.len())
        );
        let binds = ids.iter().map(|id| Value::Text(id.to_string())).collect();
        self.query_categories(&sql, binds)
    }

    fn exists_by_id(&self, ids: &[CategoryId]) -> RepoResult<ExistsById<CategoryId>> {
        let found: HashSet<CategoryId> = self
            .find_by_ids(ids)?
            .iter()
            .map(Category::category_id)
            .collect();
        let (exists, not_exists): (Vec<CategoryId>, Vec<CategoryId>) =
            ids.iter().copied().partition(|id| found.contains(id));
        Ok(ExistsById { exists, not_exists })
    }
}

impl SearchableRepository<Category> for SqliteCategoryRepository<'_> {
    fn search(&self, params: &CategorySearchParams) -> RepoResult<CategorySearchResult> {
        let mut where_sql = String::new();
        let mut binds: Vec<Value> = Vec::new();
        if let Some(filter) = params.filter() {
            where_sql.push_str(" WHERE name_search LIKE ? ESCAPE '\\'");
            binds.push(Value::Text(contains_pattern(&fold_name(filter))));
        }

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM categories{where_sql};"),
            params_from_iter(binds.iter()),
            |row| row.get(0),
        )?;

        let order_by = order_by_clause::<Category>(params, category_column);
        let sql = format!("{CATEGORY_SELECT_SQL}{where_sql} ORDER BY {order_by} LIMIT ? OFFSET ?;");
        binds.push(Value::Integer(i64::from(params.per_page())));
        binds.push(Value::Integer(
            i64::try_from(params.offset()).unwrap_or(i64::MAX),
        ));
        let items = self.query_categories(&sql, binds)?;

        Ok(SearchResult::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            params.page(),
            params.per_page(),
        ))
    }
}

fn category_column(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("name"),
        "created_at" => Some("created_at"),
        _ => None,
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("category_id")?;
    let category_id = CategoryId::parse(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in categories.category_id"
        ))
    })?;

    let snapshot = CategorySnapshot {
        category_id,
        name: row.get("name")?,
        description: row.get("description")?,
        is_active: parse_bool(row.get("is_active")?, "categories.is_active")?,
        created_at: parse_timestamp(row.get("created_at")?, "categories.created_at")?,
    };
    Category::restore(snapshot)
        .map_err(|err| RepoError::InvalidData(format!("category {id_text}: {err}")))
}
