use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Confidence, Presence};

/// Frequency bounds in Hz.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FrequencyRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// How common one modality is across a family.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ModalityPrevalence {
    #[serde(default)]
    pub presence: Presence,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub inferred_from_species: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_range: Option<FrequencyRange>,
}

/// Counters produced by [`ModalityPrevalence::absorb`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrevalenceMerge {
    pub presence_upgraded: bool,
    pub note_appended: bool,
    pub species_added: usize,
    pub frequency_range_filled: bool,
}

impl ModalityPrevalence {
    /// Fold `incoming` into `self` without losing anything already recorded.
    ///
    /// Species sets are unioned, notes are appended with `separator` unless
    /// already contained, presence only moves upward, and the frequency range
    /// is filled only when absent.
    pub fn absorb(&mut self, incoming: &Self, separator: &str) -> PrevalenceMerge {
        let mut merge = PrevalenceMerge::default();

        for species in &incoming.inferred_from_species {
            if self.inferred_from_species.insert(species.clone()) {
                merge.species_added += 1;
            }
        }

        let note = incoming.notes.trim();
        if !note.is_empty() && !self.notes.contains(note) {
            if self.notes.is_empty() {
                self.notes = note.to_string();
            } else {
                self.notes = format!("{}{separator}{note}", self.notes);
            }
            merge.note_appended = true;
        }

        let upgraded = self.presence.upgrade(incoming.presence);
        if upgraded != self.presence {
            self.presence = upgraded;
            merge.presence_upgraded = true;
        }

        if self.frequency_range.is_none() && incoming.frequency_range.is_some() {
            self.frequency_range = incoming.frequency_range;
            merge.frequency_range_filled = true;
        }

        merge
    }
}

/// Family-level synthesis keyed by canonical modality name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FamilyProfile {
    pub family_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_name: Option<String>,
    #[serde(default)]
    pub modalities: BTreeMap<String, ModalityPrevalence>,
    #[serde(default)]
    pub sources: BTreeSet<String>,
    #[serde(default)]
    pub confidence: Confidence,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prevalence(presence: Presence, notes: &str, species: &[&str]) -> ModalityPrevalence {
        ModalityPrevalence {
            presence,
            notes: notes.to_string(),
            inferred_from_species: species.iter().map(|s| (*s).to_string()).collect(),
            frequency_range: None,
        }
    }

    #[test]
    fn absorb_unions_species_and_appends_note() {
        let mut existing = prevalence(Presence::Rare, "lateral line", &["Carcharodon carcharias"]);
        let incoming = prevalence(
            Presence::Common,
            "inner ear",
            &["Carcharodon carcharias", "Isurus oxyrinchus"],
        );

        let merge = existing.absorb(&incoming, " | ");

        assert_eq!(existing.presence, Presence::Common);
        assert_eq!(existing.notes, "lateral line | inner ear");
        assert_eq!(existing.inferred_from_species.len(), 2);
        assert_eq!(
            merge,
            PrevalenceMerge {
                presence_upgraded: true,
                note_appended: true,
                species_added: 1,
                frequency_range_filled: false,
            }
        );
    }

    #[test]
    fn absorb_skips_contained_note_and_never_downgrades() {
        let mut existing = prevalence(Presence::Common, "lateral line and inner ear", &[]);
        let incoming = prevalence(Presence::Unknown, "inner ear", &[]);

        let merge = existing.absorb(&incoming, " | ");

        assert_eq!(existing.presence, Presence::Common);
        assert_eq!(existing.notes, "lateral line and inner ear");
        assert_eq!(merge, PrevalenceMerge::default());
    }

    #[test]
    fn absorb_fills_missing_frequency_range_only() {
        let mut existing = prevalence(Presence::Unknown, "", &[]);
        let mut incoming = prevalence(Presence::Unknown, "", &[]);
        incoming.frequency_range = Some(FrequencyRange {
            min: Some(20.0),
            max: Some(1500.0),
        });

        assert!(existing.absorb(&incoming, " | ").frequency_range_filled);

        let other = ModalityPrevalence {
            frequency_range: Some(FrequencyRange {
                min: Some(1.0),
                max: None,
            }),
            ..ModalityPrevalence::default()
        };
        assert!(!existing.absorb(&other, " | ").frequency_range_filled);
        assert_eq!(
            existing.frequency_range.and_then(|r| r.max),
            Some(1500.0)
        );
    }
}
