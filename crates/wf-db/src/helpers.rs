//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed row structs.
//! These helpers isolate the parsing of nullable text and datetime columns.

use chrono::NaiveDateTime;
use wf_core::datetime;
use wf_core::enums::Sex;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `NaiveDateTime` (`YYYY-MM-DD HH:MM:SS`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    datetime::parse(s)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<NaiveDateTime>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<NaiveDateTime>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse the single-letter `sex` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for anything other than `M`, `F`, `U`.
pub fn parse_sex(s: &str) -> Result<Sex, DatabaseError> {
    s.parse()
        .map_err(|e| DatabaseError::Query(format!("Failed to parse sex from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Check that a table prefix is a plain identifier fragment.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidPrefix` if the prefix contains anything
/// other than ASCII letters, digits or underscores.
pub fn validate_prefix(prefix: &str) -> Result<(), DatabaseError> {
    if prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(DatabaseError::InvalidPrefix(prefix.to_string()))
    }
}
