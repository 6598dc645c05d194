//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-batch `{trail_dir}/{batch}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use umw_core::enums::TrailOp;
use umw_core::trail::TrailOperation;
use umw_schema::SchemaRegistry;

use crate::error::DatabaseError;

pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Disabled during replay to avoid re-writing replayed operations.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a trail operation to the batch's JSONL file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.trail_dir.join(format!("{}.jsonl", op.batch));
        serde_jsonlines::append_json_lines(&path, [op])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Append with schema validation of the `data` field.
    ///
    /// Only `Ingest` ops carry a payload with a schema. Validation is
    /// warn-only so a schema change never blocks an accepted ingest.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append_validated(
        &self,
        op: &TrailOperation,
        schema: &SchemaRegistry,
    ) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        if op.op == TrailOp::Ingest {
            if let Err(e) = schema.validate("ingest_payload", &op.data) {
                tracing::warn!(entity = ?op.entity, id = %op.id, error = ?e, "trail payload failed schema validation");
            }
        }

        self.append(op)
    }

    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }
}
