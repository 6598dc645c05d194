use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::SensoryClaim;
use crate::enums::DataQualityFlag;
use crate::ids::UNKNOWN;

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Class/order/family placement. Missing ranks hold the literal `"Unknown"`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Taxonomy {
    #[serde(default = "unknown")]
    pub class: String,
    #[serde(default = "unknown")]
    pub order: String,
    #[serde(default = "unknown")]
    pub family: String,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            class: unknown(),
            order: unknown(),
            family: unknown(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Identity {
    pub common_name: String,
    pub scientific_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<u64>,
    #[serde(default)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub aliases: BTreeSet<String>,
}

impl Identity {
    /// Whether `name` is one of the primary names or a recorded alias.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.common_name == name || self.scientific_name == name || self.aliases.contains(name)
    }
}

/// Canonical per-species profile.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SpeciesRecord {
    pub identity: Identity,
    #[serde(default)]
    pub claims: Vec<SensoryClaim>,
    #[serde(default)]
    pub data_quality_flag: DataQualityFlag,
}

impl SpeciesRecord {
    /// Name used for display and for graph node identifiers: the scientific
    /// name unless it is unknown.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        if crate::ids::is_known(&self.identity.scientific_name) {
            &self.identity.scientific_name
        } else {
            &self.identity.common_name
        }
    }
}
