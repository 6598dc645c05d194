//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to load or a value did not deserialize.
    #[error("failed to load umwelt configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A value deserialized but is outside what the pipeline accepts.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
