use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{NodeKind, Relationship};
use crate::ids::node_id;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub display_name: String,
    pub kind: NodeKind,
}

impl Node {
    /// Build a node whose identifier is derived from `(kind, canonical_name)`.
    #[must_use]
    pub fn new(kind: NodeKind, canonical_name: &str, display_name: &str) -> Self {
        Self {
            id: node_id(kind, canonical_name),
            display_name: display_name.to_string(),
            kind,
        }
    }
}

/// Dedup key of an edge.
pub type EdgeKey = (String, String, Relationship);

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Edge {
    #[must_use]
    pub fn new(source_id: &str, target_id: &str, relationship: Relationship) -> Self {
        Self {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            relationship,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: serde_json::Value) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    #[must_use]
    pub fn key(&self) -> EdgeKey {
        (
            self.source_id.clone(),
            self.target_id.clone(),
            self.relationship,
        )
    }
}
