//! JSONL trail operation envelope.
//!
//! Every accepted ingest is appended as a `TrailOperation` to
//! `{trail_dir}/{batch}.jsonl`. The profile store is rebuildable by replaying
//! these files through the ingest pipeline. Old files without a `v` field
//! deserialize with `v == 1`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, TrailOp};
use crate::identity::IdentityHint;

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrailOperation {
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// RFC 3339 timestamp.
    pub ts: String,

    /// Batch that produced this operation.
    pub batch: String,

    pub op: TrailOp,

    /// Profile kind of an `ingest`. Graph operations have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityKind>,

    /// Profile key the operation resolved to.
    pub id: String,

    /// Payload. For `ingest` this is an [`IngestPayload`].
    pub data: serde_json::Value,
}

/// Replayable content of an `ingest` operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IngestPayload {
    pub hint: IdentityHint,
    pub candidate: serde_json::Value,
}
