//! SQLite schema definitions and SQL query constants.
//!
//! Pure data and pure functions, no I/O.

use rusqlite::types::Value;

use workshops_core::search::{Attendance, SearchFilter, SearchQuery};

use super::conversions::format_datetime;

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS workshops (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    start_at TEXT NOT NULL,
    end_at TEXT NOT NULL,
    is_online INTEGER NOT NULL,
    location TEXT,
    capacity INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_workshops_start_at ON workshops(start_at);
"#;

const WORKSHOP_COLUMNS: &str =
    "id, title, description, start_at, end_at, is_online, location, capacity, created_at, updated_at";

pub const INSERT_WORKSHOP: &str = r#"
INSERT INTO workshops (id, title, description, start_at, end_at, is_online, location, capacity, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const SELECT_WORKSHOP_BY_ID: &str = r#"
SELECT id, title, description, start_at, end_at, is_online, location, capacity, created_at, updated_at
FROM workshops
WHERE id = ?1
"#;

pub const WORKSHOP_EXISTS: &str = r#"
SELECT 1 FROM workshops WHERE id = ?1
"#;

/// Leaves `created_at` untouched. `?9` is the optional expected
/// `updated_at`; when set, the row only matches if it is unchanged.
pub const UPDATE_WORKSHOP: &str = r#"
UPDATE workshops
SET title = ?2, description = ?3, start_at = ?4, end_at = ?5, is_online = ?6, location = ?7, capacity = ?8, updated_at = ?10
WHERE id = ?1 AND (?9 IS NULL OR updated_at = ?9)
"#;

pub const DELETE_WORKSHOP: &str = r#"
DELETE FROM workshops
WHERE id = ?1
"#;

/// Builds the search statement for `query`.
///
/// Time and mode filters are pushed down to SQL. Term and location matching
/// collapse whitespace, which `LIKE` cannot express, so callers still apply
/// [`SearchQuery::matches`] to the returned rows.
pub fn search_workshops_sql(query: &SearchQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for filter in &query.filters {
        match filter {
            SearchFilter::StartsFrom(t) => {
                params.push(Value::Text(format_datetime(t)));
                clauses.push(format!("start_at >= ?{}", params.len()));
            }
            SearchFilter::StartsBefore(t) => {
                params.push(Value::Text(format_datetime(t)));
                clauses.push(format!("start_at < ?{}", params.len()));
            }
            SearchFilter::Mode(mode) => {
                params.push(Value::Integer(i64::from(*mode == Attendance::Online)));
                clauses.push(format!("is_online = ?{}", params.len()));
            }
            SearchFilter::Location(_) => {}
        }
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT {WORKSHOP_COLUMNS} FROM workshops {where_clause} ORDER BY start_at ASC, id ASC"
    );
    (sql, params)
}
