//! Closed enumerations for sensory claims, family prevalence, and the graph.
//!
//! Each enum serializes to the exact label used in stored JSON and in graph
//! node identifiers. `as_str()` returns the same label for SQL storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ModalityDomain
// ---------------------------------------------------------------------------

/// Top-level sensory category. The seven canonical modalities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ModalityDomain {
    Mechanoreception,
    Chemoreception,
    Photoreception,
    Electroreception,
    Magnetoreception,
    Thermoreception,
    Other,
}

impl ModalityDomain {
    pub const ALL: [Self; 7] = [
        Self::Mechanoreception,
        Self::Chemoreception,
        Self::Photoreception,
        Self::Electroreception,
        Self::Magnetoreception,
        Self::Thermoreception,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mechanoreception => "Mechanoreception",
            Self::Chemoreception => "Chemoreception",
            Self::Photoreception => "Photoreception",
            Self::Electroreception => "Electroreception",
            Self::Magnetoreception => "Magnetoreception",
            Self::Thermoreception => "Thermoreception",
            Self::Other => "Other",
        }
    }

    /// Exact match against a canonical name. No synonym handling.
    #[must_use]
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl fmt::Display for ModalityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MechanismLevel
// ---------------------------------------------------------------------------

/// Level of biological organisation at which a sensory mechanism is described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MechanismLevel {
    Anatomical,
    Cellular,
    Neural,
    Genetic,
    Behavioral,
    Physiological,
    Ecological,
    Unspecified,
    Unknown,
}

impl MechanismLevel {
    pub const ALL: [Self; 9] = [
        Self::Anatomical,
        Self::Cellular,
        Self::Neural,
        Self::Genetic,
        Self::Behavioral,
        Self::Physiological,
        Self::Ecological,
        Self::Unspecified,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anatomical => "Anatomical",
            Self::Cellular => "Cellular",
            Self::Neural => "Neural",
            Self::Genetic => "Genetic",
            Self::Behavioral => "Behavioral",
            Self::Physiological => "Physiological",
            Self::Ecological => "Ecological",
            Self::Unspecified => "Unspecified",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for MechanismLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DataQualityFlag
// ---------------------------------------------------------------------------

/// Overall evidence quality of a species record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DataQualityFlag {
    #[serde(rename = "High_Evidence")]
    HighEvidence,
    #[serde(rename = "Inferred_Only")]
    InferredOnly,
    #[serde(rename = "Contested")]
    Contested,
    #[serde(rename = "Low_Data")]
    #[default]
    LowData,
}

impl DataQualityFlag {
    pub const ALL: [Self; 4] = [
        Self::HighEvidence,
        Self::InferredOnly,
        Self::Contested,
        Self::LowData,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighEvidence => "High_Evidence",
            Self::InferredOnly => "Inferred_Only",
            Self::Contested => "Contested",
            Self::LowData => "Low_Data",
        }
    }
}

impl fmt::Display for DataQualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// Family-level prevalence of a trait.
///
/// Variants are declared in ascending rank so that `Ord` implements the
/// monotonic upgrade: `common` > `rare` > `unknown`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    #[default]
    Unknown,
    Rare,
    Common,
}

impl Presence {
    /// The stronger of the two values. Never downgrades.
    #[must_use]
    pub fn upgrade(self, other: Self) -> Self {
        self.max(other)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Rare => "rare",
            Self::Common => "common",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Confidence of a family-level synthesis pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Which kind of profile an entity is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Species,
    Family,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Kind of a graph node. Doubles as the node ID prefix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Species,
    Family,
    Order,
    Modality,
    SubType,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Family => "family",
            Self::Order => "order",
            Self::Modality => "modality",
            Self::SubType => "sub_type",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Relationship
// ---------------------------------------------------------------------------

/// Type of a graph edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    MemberOf,
    HasSense,
    InstanceOf,
}

impl Relationship {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MemberOf => "MEMBER_OF",
            Self::HasSense => "HAS_SENSE",
            Self::InstanceOf => "INSTANCE_OF",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Operation type recorded in JSONL trail files.
///
/// Only `Ingest` carries a replayable payload. `RebuildGraph` and
/// `NormalizeGraph` are markers for derived-view maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Ingest,
    RebuildGraph,
    NormalizeGraph,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::RebuildGraph => "rebuild_graph",
            Self::NormalizeGraph => "normalize_graph",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        modality_photoreception,
        ModalityDomain,
        ModalityDomain::Photoreception,
        "Photoreception"
    );
    test_serde_roundtrip!(
        mechanism_ecological,
        MechanismLevel,
        MechanismLevel::Ecological,
        "Ecological"
    );
    test_serde_roundtrip!(
        quality_low_data,
        DataQualityFlag,
        DataQualityFlag::LowData,
        "Low_Data"
    );
    test_serde_roundtrip!(
        quality_high_evidence,
        DataQualityFlag,
        DataQualityFlag::HighEvidence,
        "High_Evidence"
    );
    test_serde_roundtrip!(presence_common, Presence, Presence::Common, "common");
    test_serde_roundtrip!(confidence_medium, Confidence, Confidence::Medium, "MEDIUM");
    test_serde_roundtrip!(node_kind_sub_type, NodeKind, NodeKind::SubType, "sub_type");
    test_serde_roundtrip!(
        relationship_has_sense,
        Relationship,
        Relationship::HasSense,
        "HAS_SENSE"
    );
    test_serde_roundtrip!(
        relationship_member_of,
        Relationship,
        Relationship::MemberOf,
        "MEMBER_OF"
    );
    test_serde_roundtrip!(
        trail_op_rebuild,
        TrailOp,
        TrailOp::RebuildGraph,
        "rebuild_graph"
    );

    #[test]
    fn presence_upgrade_is_monotonic() {
        assert_eq!(Presence::Unknown.upgrade(Presence::Rare), Presence::Rare);
        assert_eq!(Presence::Rare.upgrade(Presence::Common), Presence::Common);
        assert_eq!(Presence::Common.upgrade(Presence::Unknown), Presence::Common);
        assert_eq!(Presence::Common.upgrade(Presence::Rare), Presence::Common);
        assert_eq!(Presence::Rare.upgrade(Presence::Unknown), Presence::Rare);
    }

    #[test]
    fn defaults_are_the_weakest_values() {
        assert_eq!(DataQualityFlag::default(), DataQualityFlag::LowData);
        assert_eq!(Presence::default(), Presence::Unknown);
        assert_eq!(Confidence::default(), Confidence::Low);
    }

    #[test]
    fn modality_from_canonical_is_exact() {
        assert_eq!(
            ModalityDomain::from_canonical("Magnetoreception"),
            Some(ModalityDomain::Magnetoreception)
        );
        assert_eq!(ModalityDomain::from_canonical("magnetoreception"), None);
        assert_eq!(ModalityDomain::from_canonical("Vision"), None);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ModalityDomain::Other), "Other");
        assert_eq!(format!("{}", MechanismLevel::Unspecified), "Unspecified");
        assert_eq!(format!("{}", DataQualityFlag::InferredOnly), "Inferred_Only");
        assert_eq!(format!("{}", Presence::Rare), "rare");
        assert_eq!(format!("{}", Confidence::High), "HIGH");
        assert_eq!(format!("{}", EntityKind::Family), "family");
        assert_eq!(format!("{}", NodeKind::Order), "order");
        assert_eq!(format!("{}", Relationship::InstanceOf), "INSTANCE_OF");
        assert_eq!(format!("{}", TrailOp::Ingest), "ingest");
    }
}
