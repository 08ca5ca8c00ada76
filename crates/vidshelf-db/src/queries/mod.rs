//! Database query modules.
//!
//! These free functions form the catalog-store boundary:
//! - series: lookup by root path, upsert, listing, user actions
//! - seasons: lookup by (series, number), upsert, hidden flag, counters
//! - episodes: lookup by (season, number), upsert, watched flag

pub mod episodes;
pub mod seasons;
pub mod series;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;

/// Decode a typed id stored as TEXT.
pub(crate) fn parse_id<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode an RFC 3339 timestamp stored as TEXT.
pub(crate) fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a JSON string array; malformed values read as empty.
pub(crate) fn parse_string_list(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

pub(crate) fn encode_string_list(values: &[String]) -> vidshelf_common::Result<String> {
    serde_json::to_string(values).map_err(|e| vidshelf_common::Error::internal(e.to_string()))
}
