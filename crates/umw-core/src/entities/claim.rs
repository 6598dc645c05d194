use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MechanismLevel, ModalityDomain};

/// A measured range for a sensory threshold.
///
/// At least one bound is always present. Blocks with both bounds missing are
/// dropped at validation time and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuantitativeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl QuantitativeData {
    /// `true` when neither bound is known.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Mechanism {
    pub level: MechanismLevel,
    #[serde(default)]
    pub description: String,
}

/// A single piece of supporting evidence. `citation` is the dedup key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Evidence {
    pub source_type: String,
    pub source_name: String,
    pub citation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// The atomic unit of knowledge: one sense of one species.
///
/// `(modality_domain, sub_type)` is the claim slot used as merge key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SensoryClaim {
    pub modality_domain: ModalityDomain,
    pub sub_type: String,
    pub stimulus_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantitative_data: Option<QuantitativeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<Mechanism>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl SensoryClaim {
    #[must_use]
    pub fn slot(&self) -> (ModalityDomain, &str) {
        (self.modality_domain, self.sub_type.as_str())
    }

    /// Whether the evidence list already carries this exact citation.
    #[must_use]
    pub fn has_citation(&self, citation: &str) -> bool {
        self.evidence.iter().any(|e| e.citation == citation)
    }
}
