//! SQL helpers shared by the SQLite repositories.
//!
//! # Invariants
//! - Caller text never reaches SQL except through bound parameters.
//! - `ORDER BY` columns come from static per-repository mappings gated by
//!   `Searchable::SORTABLE_FIELDS`.

use crate::db::migrations::latest_version;
use crate::repo::repository::{RepoError, RepoResult, Searchable};
use crate::repo::search::{SearchParams, SortDirection};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

/// Verifies schema version, table and columns before a repository is built.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Builds a `LIKE` pattern matching `needle` anywhere, with wildcards in
/// the needle escaped for `ESCAPE '\'`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Renders the `ORDER BY` body for a search.
///
/// Falls back to `Searchable::default_sort` when the requested field is
/// absent, not allow-listed, or has no column mapping. `rowid` breaks ties
/// so pages stay deterministic and match insertion order.
pub(crate) fn order_by_clause<E: Searchable>(
    params: &SearchParams<E::Filter>,
    column_for: fn(&str) -> Option<&'static str>,
) -> String {
    let requested = params
        .sort()
        .filter(|field| E::is_sortable(field))
        .and_then(|field| {
            column_for(field).map(|column| (column, params.sort_dir().unwrap_or(SortDirection::Asc)))
        });
    let fallback = || {
        E::default_sort()
            .and_then(|(field, direction)| column_for(field).map(|column| (column, direction)))
    };

    match requested.or_else(fallback) {
        Some((column, direction)) => format!("{column} {}, rowid ASC", direction.as_sql()),
        None => "rowid ASC".to_string(),
    }
}

/// Comma-separated `?` placeholders for an `IN (...)` list.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub(crate) fn timestamp_to_db(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn parse_timestamp(value: i64, column: &'static str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}"))
    })
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
