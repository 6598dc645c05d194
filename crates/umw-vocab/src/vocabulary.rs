use std::collections::BTreeMap;

use umw_core::enums::ModalityDomain;
use umw_core::ids::collapse_whitespace;

use crate::error::VocabularyError;

use ModalityDomain::{
    Chemoreception, Electroreception, Mechanoreception, Photoreception, Thermoreception,
};

/// Built-in labels seen in extraction output, already folded.
const BUILTIN: &[(&str, ModalityDomain)] = &[
    // Mechanoreception
    ("mechanosensation", Mechanoreception),
    ("hearing", Mechanoreception),
    ("audition", Mechanoreception),
    ("auditory", Mechanoreception),
    ("vibration", Mechanoreception),
    ("vibration sense", Mechanoreception),
    ("vibratory sense", Mechanoreception),
    ("vibration detection", Mechanoreception),
    ("tactile", Mechanoreception),
    ("tactition", Mechanoreception),
    ("touch", Mechanoreception),
    ("tactile sense", Mechanoreception),
    ("tactile sensing", Mechanoreception),
    ("tactile sensation", Mechanoreception),
    ("tactile reception", Mechanoreception),
    ("tactile perception", Mechanoreception),
    ("touch vibration", Mechanoreception),
    ("touch tactition", Mechanoreception),
    ("touch mechanoreception", Mechanoreception),
    ("somatosensation", Mechanoreception),
    ("proprioception", Mechanoreception),
    ("lateral line", Mechanoreception),
    ("water flow detection", Mechanoreception),
    ("statocysts", Mechanoreception),
    ("georeception", Mechanoreception),
    ("mechanoreception (antennae)", Mechanoreception),
    // Chemoreception
    ("taste", Chemoreception),
    ("smell", Chemoreception),
    ("olfaction", Chemoreception),
    ("gustation", Chemoreception),
    ("chemical detection", Chemoreception),
    ("taste smell", Chemoreception),
    ("taste gustation", Chemoreception),
    ("taste chemoreception", Chemoreception),
    ("contact chemoreception", Chemoreception),
    ("pheromone detection", Chemoreception),
    ("oxygen sensing", Chemoreception),
    // Photoreception
    ("vision", Photoreception),
    ("light sensitivity", Photoreception),
    ("light detection", Photoreception),
    ("light attraction", Photoreception),
    ("photosymbiosis related light detection", Photoreception),
    ("color vision", Photoreception),
    ("image forming vision", Photoreception),
    ("polarized light vision", Photoreception),
    ("brightness discrimination", Photoreception),
    ("bioluminescence detection", Photoreception),
    ("fluorescence detection", Photoreception),
    // Electroreception
    ("active electroreception", Electroreception),
    ("passive electroreception", Electroreception),
    // Thermoreception
    ("temperature sensing", Thermoreception),
    ("heat detection", Thermoreception),
    ("infrared detection", Thermoreception),
    // Magnetoreception has only its canonical name.
];

/// Lookup key: lower-case, `_` `-` `/` read as spaces, whitespace runs
/// collapsed.
#[must_use]
pub fn fold_label(label: &str) -> String {
    collapse_whitespace(&label.to_lowercase().replace(['_', '-', '/'], " "))
}

/// Immutable label → canonical modality table.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    table: BTreeMap<String, ModalityDomain>,
}

impl Vocabulary {
    /// Canonical names (case-insensitive) plus the built-in synonym list.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table: BTreeMap<String, ModalityDomain> = ModalityDomain::ALL
            .iter()
            .map(|d| (fold_label(d.as_str()), *d))
            .collect();
        for (label, domain) in BUILTIN {
            table.insert(fold_label(label), *domain);
        }
        Self { table }
    }

    /// Layer extra `label = "CanonicalName"` entries over the table.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::UnknownTarget`] if a target is not one of the
    /// seven canonical modality names (matched case-insensitively).
    pub fn with_synonyms<'a>(
        mut self,
        synonyms: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, VocabularyError> {
        for (label, target) in synonyms {
            let key = fold_label(label);
            if key.is_empty() {
                return Err(VocabularyError::EmptyLabel);
            }
            let folded_target = fold_label(target);
            let domain = ModalityDomain::ALL
                .into_iter()
                .find(|d| fold_label(d.as_str()) == folded_target)
                .ok_or_else(|| VocabularyError::UnknownTarget {
                    label: label.clone(),
                    target: target.clone(),
                })?;
            self.table.insert(key, domain);
        }
        Ok(self)
    }

    /// The canonical modality `label` maps to, if any.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<ModalityDomain> {
        self.table.get(&fold_label(label)).copied()
    }

    /// Canonical modality name for known labels, otherwise the label with
    /// whitespace trimmed and collapsed.
    #[must_use]
    pub fn canonicalize(&self, label: &str) -> String {
        self.lookup(label).map_or_else(
            || collapse_whitespace(label),
            |domain| domain.as_str().to_string(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
