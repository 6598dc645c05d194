use std::collections::BTreeMap;

use umw_core::entities::{FamilyProfile, ModalityPrevalence, Node, SpeciesRecord};
use umw_core::enums::NodeKind;
use umw_core::ids::node_id;
use umw_core::responses::NormalizeReport;
use umw_core::units::normalize_quantitative;
use umw_graph::Graph;

use crate::vocabulary::Vocabulary;

const DEFAULT_NOTE_SEPARATOR: &str = " | ";

/// Applies a [`Vocabulary`] to records and graphs.
#[derive(Debug, Clone)]
pub struct Normalizer {
    vocabulary: Vocabulary,
    note_separator: String,
}

impl Normalizer {
    #[must_use]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            note_separator: DEFAULT_NOTE_SEPARATOR.to_string(),
        }
    }

    /// Separator used when two family modality keys collapse and their notes
    /// are joined.
    #[must_use]
    pub fn with_note_separator(mut self, separator: impl Into<String>) -> Self {
        self.note_separator = separator.into();
        self
    }

    #[must_use]
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn note_separator(&self) -> &str {
        &self.note_separator
    }

    /// Rewrite claim `sub_type` labels and convert quantitative units.
    #[must_use]
    pub fn normalize_species(&self, mut record: SpeciesRecord) -> SpeciesRecord {
        for claim in &mut record.claims {
            let canonical = self.vocabulary.canonicalize(&claim.sub_type);
            if canonical != claim.sub_type {
                tracing::debug!(from = %claim.sub_type, to = %canonical, "sub_type rewritten");
                claim.sub_type = canonical;
            }
            if let Some(data) = claim.quantitative_data.as_ref() {
                claim.quantitative_data = Some(normalize_quantitative(data));
            }
        }
        record
    }

    /// Rewrite modality keys. Keys that collapse onto the same canonical name
    /// are combined with the family per-modality merge rule.
    #[must_use]
    pub fn normalize_family(&self, mut profile: FamilyProfile) -> FamilyProfile {
        let mut modalities: BTreeMap<String, ModalityPrevalence> = BTreeMap::new();
        for (key, prevalence) in std::mem::take(&mut profile.modalities) {
            let canonical = self.vocabulary.canonicalize(&key);
            match modalities.get_mut(&canonical) {
                Some(existing) => {
                    tracing::debug!(from = %key, to = %canonical, "modality keys collapsed");
                    existing.absorb(&prevalence, &self.note_separator);
                }
                None => {
                    modalities.insert(canonical, prevalence);
                }
            }
        }
        profile.modalities = modalities;
        profile
    }

    /// Batch pass over a built graph.
    ///
    /// `modality` and `sub_type` nodes whose display name maps to a canonical
    /// modality are replaced by the canonical `modality:` node. Edges are
    /// redirected, self-loops created by the redirect are dropped, and edges
    /// that become duplicates collapse to the first one. Rewritten nodes left
    /// unreferenced are removed.
    pub fn normalize_graph(&self, graph: &mut Graph) -> NormalizeReport {
        let mut report = NormalizeReport::default();

        let mut redirects: BTreeMap<String, String> = BTreeMap::new();
        let mut canonical_nodes = Vec::new();
        for node in graph
            .nodes()
            .filter(|n| matches!(n.kind, NodeKind::Modality | NodeKind::SubType))
        {
            let Some(domain) = self.vocabulary.lookup(&node.display_name) else {
                continue;
            };
            let target = node_id(NodeKind::Modality, domain.as_str());
            if target != node.id {
                redirects.insert(node.id.clone(), target);
                canonical_nodes.push(Node::new(NodeKind::Modality, domain.as_str(), domain.as_str()));
            }
        }

        if redirects.is_empty() {
            return report;
        }

        for node in canonical_nodes {
            graph.add_node(node);
        }
        report.nodes_rewritten = count(redirects.len());

        for mut edge in graph.drain_edges() {
            let mut redirected = false;
            if let Some(target) = redirects.get(&edge.source_id) {
                edge.source_id.clone_from(target);
                redirected = true;
            }
            if let Some(target) = redirects.get(&edge.target_id) {
                edge.target_id.clone_from(target);
                redirected = true;
            }
            if redirected {
                report.edges_redirected += 1;
            }
            if edge.source_id == edge.target_id || !graph.add_edge(edge) {
                report.edges_collapsed += 1;
            }
        }

        for old_id in redirects.keys() {
            if !graph.is_referenced(old_id) && graph.remove_node(old_id).is_some() {
                report.nodes_removed += 1;
            }
        }

        tracing::info!(
            nodes_rewritten = report.nodes_rewritten,
            nodes_removed = report.nodes_removed,
            edges_redirected = report.edges_redirected,
            edges_collapsed = report.edges_collapsed,
            "graph normalized"
        );
        report
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Vocabulary::builtin())
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
