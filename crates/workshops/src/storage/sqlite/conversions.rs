//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use workshops_core::workshop::Workshop;

/// Convert a SQLite row to a Workshop.
///
/// Expected columns: id, title, description, start_at, end_at, is_online,
/// location, capacity, created_at, updated_at
pub fn row_to_workshop(row: &Row) -> rusqlite::Result<Workshop> {
    let id: String = row.get(0)?;
    let start_at: String = row.get(3)?;
    let end_at: String = row.get(4)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(Workshop {
        id: parse_uuid(&id)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_at: parse_datetime(&start_at)?,
        end_at: parse_datetime(&end_at)?,
        is_online: row.get(5)?,
        location: row.get(6)?,
        capacity: row.get(7)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Fixed-width RFC 3339 with nanoseconds and a `Z` suffix, so text
/// comparison in SQL orders the same way as the instants do.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
