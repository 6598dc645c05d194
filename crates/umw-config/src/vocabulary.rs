use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Extra label → canonical modality entries layered over the built-in table.
///
/// ```toml
/// [vocabulary.synonyms]
/// "infrared sensing" = "Thermoreception"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,
}
