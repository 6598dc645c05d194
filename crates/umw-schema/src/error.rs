//! Schema validation error types.

use thiserror::Error;

/// A candidate record that could not be turned into a valid typed record.
///
/// `field` is a path into the candidate such as
/// `sensory_modalities[2].quantitative_data.max`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}: {field} {constraint}")]
pub struct SchemaViolation {
    pub entity: String,
    pub field: String,
    pub constraint: String,
}

/// Errors from the schema registry and validator.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<String> },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// Candidate record rejected by the validator.
    #[error("Schema violation: {0}")]
    Violation(#[from] SchemaViolation),
}
