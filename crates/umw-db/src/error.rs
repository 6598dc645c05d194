//! Database error types for umw-db.

use thiserror::Error;
use umw_core::errors::CoreError;
use umw_schema::SchemaViolation;
use umw_vocab::VocabularyError;

/// Errors from the profile store, graph store, and ingest pipeline.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A stored profile could not be read back, so nothing can be merged into it.
    #[error("Merge conflict on {profile_id}: {reason}")]
    MergeConflict { profile_id: String, reason: String },

    /// The profile changed between load and save.
    #[error("Stale version for {profile_id}: expected {expected}")]
    StaleVersion { profile_id: String, expected: i64 },

    /// The candidate record was rejected by the validator.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Errors that concern one record only. Batch ingest reports these and
    /// moves on to the next candidate.
    #[must_use]
    pub const fn is_record_scoped(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::MergeConflict { .. } | Self::StaleVersion { .. } | Self::Core(_)
        )
    }
}
