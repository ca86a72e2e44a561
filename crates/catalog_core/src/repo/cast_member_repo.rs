//! Cast member repository contract and SQLite implementation.
//!
//! # Invariants
//! - Filter criteria (name substring, member type) are AND-ed.
//! - Sortable fields: `name`, `created_at`; default order `created_at DESC`.

use crate::model::cast_member::{CastMember, CastMemberSnapshot, CastMemberType};
use crate::model::entity::Entity;
use crate::model::id::CastMemberId;
use crate::repo::in_memory::InMemoryRepository;
use crate::repo::repository::{
    ExistsById, RepoError, RepoResult, Repository, Searchable, SearchableRepository, SortValue,
};
use crate::repo::search::{
    fold_name, SearchFilter, SearchParams, SearchResult, SortDirection,
};
use crate::repo::sqlite::{
    contains_pattern, ensure_table_ready, order_by_clause, parse_timestamp,
    placeholders, timestamp_to_db,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;

/// Cast member search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CastMemberFilter {
    /// Case-insensitive substring of the member name.
    pub name: Option<String>,
    pub member_type: Option<CastMemberType>,
}

impl CastMemberFilter {
    fn name_needle(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

impl SearchFilter for CastMemberFilter {
    fn is_blank(&self) -> bool {
        self.name_needle().is_none() && self.member_type.is_none()
    }
}

pub type CastMemberSearchParams = SearchParams<CastMemberFilter>;
pub type CastMemberSearchResult = SearchResult<CastMember>;
pub type CastMemberInMemoryRepository = InMemoryRepository<CastMember>;

/// Searchable repository for cast members.
pub trait CastMemberRepository: SearchableRepository<CastMember> {}

impl<T: SearchableRepository<CastMember>> CastMemberRepository for T {}

impl Searchable for CastMember {
    type Filter = CastMemberFilter;
    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "created_at"];

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("created_at", SortDirection::Desc))
    }

    fn matches_filter(&self, filter: &Self::Filter) -> bool {
        let name_matches = filter.name_needle().map_or(true, |needle| {
            fold_name(self.name()).contains(&fold_name(needle))
        });
        let type_matches = filter
            .member_type
            .map_or(true, |member_type| self.member_type() == member_type);
        name_matches && type_matches
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name().to_string())),
            "created_at" => Some(SortValue::Timestamp(self.created_at())),
            _ => None,
        }
    }
}

const CAST_MEMBER_TABLE: &str = "cast_members";
const CAST_MEMBER_COLUMNS: &[&str] = &[
    "cast_member_id",
    "name",
    "name_search",
    "member_type",
    "created_at",
];
const CAST_MEMBER_SELECT_SQL: &str = "SELECT
    cast_member_id,
    name,
    member_type,
    created_at
FROM cast_members";

/// SQLite-backed cast member repository.
pub struct SqliteCastMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCastMemberRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, CAST_MEMBER_TABLE, CAST_MEMBER_COLUMNS)?;
        Ok(Self { conn })
    }

    fn insert_with(conn: &Connection, entity: &CastMember) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO cast_members (
                cast_member_id,
                name,
                name_search,
                member_type,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entity.cast_member_id().to_string(),
                entity.name(),
                fold_name(entity.name()),
                entity.member_type().code(),
                timestamp_to_db(entity.created_at()),
            ],
        )?;
        Ok(())
    }

    fn query_cast_members(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Vec<CastMember>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_cast_member_row(row)?);
        }
        Ok(items)
    }
}

impl Repository<CastMember> for SqliteCastMemberRepository<'_> {
    fn insert(&self, entity: &CastMember) -> RepoResult<()> {
        Self::insert_with(self.conn, entity)
    }

    fn bulk_insert(&self, entities: &[CastMember]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for entity in entities {
            Self::insert_with(&tx, entity)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update(&self, entity: &CastMember) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE cast_members
             SET
                name = ?2,
                name_search = ?3,
                member_type = ?4,
                created_at = ?5
             WHERE cast_member_id = ?1;",
            params![
                entity.cast_member_id().to_string(),
                entity.name(),
                fold_name(entity.name()),
                entity.member_type().code(),
                timestamp_to_db(entity.created_at()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found::<CastMember>(entity.entity_id()));
        }
        Ok(())
    }

    fn delete(&self, id: &CastMemberId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM cast_members WHERE cast_member_id = ?1;",
            [id.to_string()],
        )?;

        if changed != 1 {
            return Err(RepoError::not_found::<CastMember>(id));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &CastMemberId) -> RepoResult<Option<CastMember>> {
        let mut items = self.query_cast_members(
            &format!("{CAST_MEMBER_SELECT_SQL} WHERE cast_member_id = ?1;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(items.pop())
    }

    fn find_all(&self) -> RepoResult<Vec<CastMember>> {
        self.query_cast_members(
            &format!("{CAST_MEMBER_SELECT_SQL} ORDER BY rowid ASC;"),
            Vec::new(),
        )
    }

    fn find_by_ids(&self, ids: &[CastMemberId]) -> RepoResult<Vec<CastMember>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{CAST_MEMBER_SELECT_SQL} WHERE cast_member_id IN ({}) ORDER BY rowid ASC;",
            placeholders(ids.len())
        );
        let binds = ids.iter().map(|id| Value::Text(id.to_string())).collect();
        self.query_cast_members(&sql, binds)
    }

    fn exists_by_id(&self, ids: &[CastMemberId]) -> RepoResult<ExistsById<CastMemberId>> {
        let found: HashSet<CastMemberId> = self
            .find_by_ids(ids)?
            .iter()
            .map(CastMember::cast_member_id)
            .collect();
        let (exists, not_exists): (Vec<CastMemberId>, Vec<CastMemberId>) =
            ids.iter().copied().partition(|id| found.contains(id));
        Ok(ExistsById { exists, not_exists })
    }
}

impl SearchableRepository<CastMember> for SqliteCastMemberRepository<'_> {
    fn search(&self, params: &CastMemberSearchParams) -> RepoResult<CastMemberSearchResult> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<Value> = Vec::new();
        if let Some(filter) = params.filter() {
            if let Some(needle) = filter.name_needle() {
                conditions.push("name_search LIKE ? ESCAPE '\\'");
                binds.push(Value::Text(contains_pattern(&fold_name(needle))));
            }
            if let Some(member_type) = filter.member_type {
                conditions.push("member_type = ?");
                binds.push(Value::Integer(member_type.code()));
            }
        }
        let where_sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM cast_members{where_sql};"),
            params_from_iter(binds.iter()),
            |row| row.get(0),
        )?;

        let order_by = order_by_clause::<CastMember>(params, cast_member_column);
        let sql =
            format!("{CAST_MEMBER_SELECT_SQL}{where_sql} ORDER BY {order_by} LIMIT ? OFFSET ?;");
        binds.push(Value::Integer(i64::from(params.per_page())));
        binds.push(Value::Integer(
            i64::try_from(params.offset()).unwrap_or(i64::MAX),
        ));
        let items = self.query_cast_members(&sql, binds)?;

        Ok(SearchResult::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            params.page(),
            params.per_page(),
        ))
    }
}

fn cast_member_column(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("name"),
        "created_at" => Some("created_at"),
        _ => None,
    }
}

fn parse_cast_member_row(row: &Row<'_>) -> RepoResult<CastMember> {
    let id_text: String = row.get("cast_member_id")?;
    let cast_member_id = CastMemberId::parse(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in cast_members.cast_member_id"
        ))
    })?;

    let type_code: i64 = row.get("member_type")?;
    let member_type = CastMemberType::try_from_code(type_code).map_err(|err| {
        RepoError::InvalidData(format!("{err} in cast_members.member_type"))
    })?;

    let snapshot = CastMemberSnapshot {
        cast_member_id,
        name: row.get("name")?,
        member_type,
        created_at: parse_timestamp(row.get("created_at")?, "cast_members.created_at")?,
    };
    CastMember::restore(snapshot)
        .map_err(|err| RepoError::InvalidData(format!("cast member {id_text}: {err}")))
}
