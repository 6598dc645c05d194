//! Merge statistics and identity resolution outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Counters describing what a merge changed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MergeOutcome {
    pub claims_added: u32,
    pub evidence_added: u32,
    pub aliases_added: u32,
    pub quantitative_adopted: u32,
    pub modalities_added: u32,
    pub presence_upgrades: u32,
    pub notes_appended: u32,
    pub sources_added: u32,
}

impl MergeOutcome {
    /// `true` when the merge left the profile exactly as it was.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.claims_added == 0
            && self.evidence_added == 0
            && self.aliases_added == 0
            && self.quantitative_adopted == 0
            && self.modalities_added == 0
            && self.presence_upgrades == 0
            && self.notes_appended == 0
            && self.sources_added == 0
    }

    pub fn accumulate(&mut self, other: &Self) {
        self.claims_added += other.claims_added;
        self.evidence_added += other.evidence_added;
        self.aliases_added += other.aliases_added;
        self.quantitative_adopted += other.quantitative_adopted;
        self.modalities_added += other.modalities_added;
        self.presence_upgrades += other.presence_upgrades;
        self.notes_appended += other.notes_appended;
        self.sources_added += other.sources_added;
    }
}

/// How an incoming record was matched to a stored profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdentityResolution {
    /// Matched by stable identifier.
    StableId,
    /// No stable identifier; exactly one profile answers to the name.
    NameMatch,
    /// No existing profile matched.
    New,
    /// Several profiles answer to the name; stored as a new entity.
    Ambiguous,
}

impl IdentityResolution {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StableId => "stable_id",
            Self::NameMatch => "name_match",
            Self::New => "new",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for IdentityResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
