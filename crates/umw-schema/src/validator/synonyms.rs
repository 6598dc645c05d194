//! Remapping tables applied before enumeration membership checks.
//!
//! | Label                     | Maps to          |
//! |---------------------------|------------------|
//! | Vision                    | Photoreception   |
//! | Hearing, Touch            | Mechanoreception |
//! | Smell, Taste              | Chemoreception   |
//! | Low_Evidence              | Low_Data         |
//! | Molecular                 | Genetic          |
//! | Morphological             | Anatomical       |
//! | Not specified             | Unspecified      |
//!
//! Canonical names match case-insensitively.

use umw_core::enums::{Confidence, DataQualityFlag, MechanismLevel, ModalityDomain, Presence};

const MODALITY_SYNONYMS: &[(&str, ModalityDomain)] = &[
    ("vision", ModalityDomain::Photoreception),
    ("hearing", ModalityDomain::Mechanoreception),
    ("smell", ModalityDomain::Chemoreception),
    ("taste", ModalityDomain::Chemoreception),
    ("touch", ModalityDomain::Mechanoreception),
];

const MECHANISM_SYNONYMS: &[(&str, MechanismLevel)] = &[
    ("molecular", MechanismLevel::Genetic),
    ("morphological", MechanismLevel::Anatomical),
    ("not specified", MechanismLevel::Unspecified),
];

const QUALITY_SYNONYMS: &[(&str, DataQualityFlag)] = &[("low evidence", DataQualityFlag::LowData)];

/// Lower-case, treat `_` and `-` as spaces, collapse whitespace.
fn fold(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup<T: Copy>(
    label: &str,
    canonical: impl IntoIterator<Item = (&'static str, T)>,
    synonyms: &[(&str, T)],
) -> Option<T> {
    let folded = fold(label);
    canonical
        .into_iter()
        .find(|(name, _)| fold(name) == folded)
        .map(|(_, value)| value)
        .or_else(|| {
            synonyms
                .iter()
                .find(|(name, _)| *name == folded)
                .map(|(_, value)| *value)
        })
}

#[must_use]
pub fn modality_domain(label: &str) -> Option<ModalityDomain> {
    lookup(
        label,
        ModalityDomain::ALL.map(|d| (d.as_str(), d)),
        MODALITY_SYNONYMS,
    )
}

#[must_use]
pub fn mechanism_level(label: &str) -> Option<MechanismLevel> {
    lookup(
        label,
        MechanismLevel::ALL.map(|l| (l.as_str(), l)),
        MECHANISM_SYNONYMS,
    )
}

#[must_use]
pub fn data_quality_flag(label: &str) -> Option<DataQualityFlag> {
    lookup(
        label,
        DataQualityFlag::ALL.map(|f| (f.as_str(), f)),
        QUALITY_SYNONYMS,
    )
}

#[must_use]
pub fn presence(label: &str) -> Option<Presence> {
    lookup(
        label,
        [Presence::Common, Presence::Rare, Presence::Unknown].map(|p| (p.as_str(), p)),
        &[],
    )
}

#[must_use]
pub fn confidence(label: &str) -> Option<Confidence> {
    lookup(
        label,
        [Confidence::Low, Confidence::Medium, Confidence::High].map(|c| (c.as_str(), c)),
        &[],
    )
}
