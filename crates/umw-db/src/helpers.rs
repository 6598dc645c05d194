//! Row parsing helpers.
//!
//! Handles the dual datetime format issue (`SQLite`'s `datetime('now')` vs
//! Rust's `to_rfc3339()`) and the mapping from entity kind to table.

use chrono::{DateTime, Utc};
use umw_core::enums::EntityKind;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable INTEGER column holding a stable identifier.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails or the value is negative.
pub fn get_opt_stable_id(row: &libsql::Row, idx: i32) -> Result<Option<u64>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|raw| {
            u64::try_from(raw)
                .map_err(|_| DatabaseError::InvalidState(format!("negative stable_id {raw}")))
        })
        .transpose()
}

/// Stable identifiers are stored as SQLite INTEGER.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for identifiers above `i64::MAX`.
pub fn stable_id_param(stable_id: Option<u64>) -> Result<Option<i64>, DatabaseError> {
    stable_id
        .map(|id| {
            i64::try_from(id)
                .map_err(|_| DatabaseError::InvalidState(format!("stable_id {id} out of range")))
        })
        .transpose()
}

/// Map an entity kind to its profile table.
#[must_use]
pub const fn profile_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Species => "species_profiles",
        EntityKind::Family => "family_profiles",
    }
}

pub(crate) fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
