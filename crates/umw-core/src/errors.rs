//! Cross-cutting error types for umwelt.
//!
//! Domain-specific errors (`SchemaError`, `DatabaseError`, `ConfigError`) live
//! in their own crates and converge into `anyhow::Error` in `umw-cli`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A profile key could not be parsed.
    #[error("Invalid profile key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
