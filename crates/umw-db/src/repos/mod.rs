//! Repository modules for profiles, the derived graph, and reports.
//!
//! Each module adds methods to `UmwService` via `impl UmwService` blocks.

pub mod family;
pub mod graph;
pub mod profile;
pub mod report;
pub mod species;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A profile as stored: the record plus its storage envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    pub key: String,
    pub stable_id: Option<u64>,
    /// Starts at 1, incremented by every successful save.
    pub version: i64,
    pub record: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
