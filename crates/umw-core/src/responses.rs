//! Response types returned by the service layer and printed by `umw`.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::outcome::{IdentityResolution, MergeOutcome};

/// Result of ingesting one accepted candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestResponse {
    pub kind: EntityKind,
    pub key: String,
    pub name: String,
    pub resolution: IdentityResolution,
    pub created: bool,
    pub version: i64,
    pub outcome: MergeOutcome,
}

/// A candidate that was rejected. Batch ingest continues past these.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestFailure {
    /// File or position the candidate came from.
    pub origin: String,
    pub entity: String,
    pub error: String,
}

/// Per-batch summary from `umw ingest` and `ingest_batch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchReport {
    pub accepted: Vec<IngestResponse>,
    pub rejected: Vec<IngestFailure>,
    pub created: u32,
    pub merged: u32,
    pub totals: MergeOutcome,
}

impl BatchReport {
    pub fn record_accepted(&mut self, response: IngestResponse) {
        if response.created {
            self.created += 1;
        } else {
            self.merged += 1;
        }
        self.totals.accumulate(&response.outcome);
        self.accepted.push(response);
    }

    pub fn record_rejected(&mut self, failure: IngestFailure) {
        self.rejected.push(failure);
    }

    pub fn absorb(&mut self, other: Self) {
        for response in other.accepted {
            self.record_accepted(response);
        }
        self.rejected.extend(other.rejected);
    }
}

/// Response from `umw rebuild`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RebuildResponse {
    pub species: u32,
    pub families: u32,
    pub nodes: u32,
    pub edges: u32,
}

/// Response from the graph-level normalization pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NormalizeReport {
    pub nodes_rewritten: u32,
    pub nodes_removed: u32,
    pub edges_redirected: u32,
    pub edges_collapsed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClaimDensityRow {
    pub key: String,
    pub name: String,
    pub claims: u32,
}

/// Claim slots per species, with an imbalance warning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClaimDensityReport {
    pub rows: Vec<ClaimDensityRow>,
    pub max_claims: u32,
    /// Smallest non-zero count. Zero-claim species do not participate.
    pub min_claims: u32,
    pub ratio: Option<f64>,
    pub threshold: f64,
    pub imbalanced: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SenseCount {
    pub id: String,
    pub display_name: String,
    pub count: u32,
}

/// Response from `umw report summary`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphSummary {
    pub nodes_by_kind: BTreeMap<String, u32>,
    pub edges_by_relationship: BTreeMap<String, u32>,
    pub top_senses: Vec<SenseCount>,
}

/// One row of `umw query orders`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrderModalityCount {
    pub order: String,
    pub members: u32,
}

/// Response from `umw report matrix`: distinct members per order and modality.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrderModalityMatrix {
    pub orders: Vec<String>,
    pub modalities: Vec<String>,
    pub cells: BTreeMap<String, BTreeMap<String, u32>>,
}

impl OrderModalityMatrix {
    #[must_use]
    pub fn count(&self, order: &str, modality: &str) -> u32 {
        self.cells
            .get(order)
            .and_then(|row| row.get(modality))
            .copied()
            .unwrap_or(0)
    }
}

/// Response from `umw replay`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReplayResponse {
    pub trail_files: u32,
    pub operations: u32,
    pub accepted: u32,
    pub rejected: u32,
}
