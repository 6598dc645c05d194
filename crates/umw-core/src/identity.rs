//! Caller-supplied identity information for a candidate record.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What the caller already knows about the entity a candidate describes.
///
/// Values here take precedence over the same fields inside the candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IdentityHint {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub representative_species: Vec<String>,
}

impl IdentityHint {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_stable_id(mut self, stable_id: u64) -> Self {
        self.stable_id = Some(stable_id);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order_name: impl Into<String>) -> Self {
        self.order_name = Some(order_name.into());
        self
    }

    #[must_use]
    pub fn with_representatives<S: Into<String>>(mut self, species: impl IntoIterator<Item = S>) -> Self {
        self.representative_species = species.into_iter().map(Into::into).collect();
        self
    }

    /// Fill every field left unset from `fallback`.
    #[must_use]
    pub fn or(mut self, fallback: &Self) -> Self {
        if self.display_name().is_none() {
            self.name.clone_from(&fallback.name);
        }
        if self.stable_id.is_none() {
            self.stable_id = fallback.stable_id;
        }
        if self.order_name.is_none() {
            self.order_name.clone_from(&fallback.order_name);
        }
        if self.representative_species.is_empty() {
            self.representative_species.clone_from(&fallback.representative_species);
        }
        self
    }

    /// The display name, trimmed, or `None` when blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        let trimmed = self.name.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
