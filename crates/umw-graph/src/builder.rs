//! Projection of profiles into the taxonomy and sensory graph.
//!
//! Species emit `MEMBER_OF` edges species→family→order (species→order when
//! only the order is known) and `HAS_SENSE` edges to each claimed modality.
//! A claim whose `sub_type` differs from its modality name also emits a
//! `sub_type` node with `INSTANCE_OF` to the modality and a `HAS_SENSE` edge
//! carrying the quantitative data. Family profiles emit `HAS_SENSE` edges
//! with a `prevalence` attribute. Family keys that are not canonical modality
//! names become `sub_type` nodes under `Other`.

use umw_core::entities::{Edge, FamilyProfile, ModalityPrevalence, Node, SensoryClaim, SpeciesRecord};
use umw_core::enums::{ModalityDomain, NodeKind, Relationship};
use umw_core::ids::{collapse_whitespace, is_known};

use crate::graph::Graph;

#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_species(&mut self, record: &SpeciesRecord) {
        let name = collapse_whitespace(record.canonical_name());
        let species = Node::new(NodeKind::Species, &name, &record.identity.common_name);
        let species_id = species.id.clone();
        self.graph.add_node(species);

        let taxonomy = &record.identity.taxonomy;
        let family_id = is_known(&taxonomy.family).then(|| self.family_node(&taxonomy.family));
        let order_id = is_known(&taxonomy.order).then(|| self.order_node(&taxonomy.order));

        match (&family_id, &order_id) {
            (Some(family), Some(order)) => {
                self.member_of(&species_id, family);
                self.member_of(family, order);
            }
            (Some(family), None) => self.member_of(&species_id, family),
            (None, Some(order)) => self.member_of(&species_id, order),
            (None, None) => {}
        }

        for claim in &record.claims {
            self.add_claim(&species_id, claim);
        }
    }

    pub fn add_family(&mut self, profile: &FamilyProfile) {
        let family_id = self.family_node(&profile.family_name);
        if let Some(order) = profile.order_name.as_deref().filter(|o| is_known(o)) {
            let order_id = self.order_node(order);
            self.member_of(&family_id, &order_id);
        }

        for (key, prevalence) in &profile.modalities {
            let edge_target = match ModalityDomain::from_canonical(key) {
                Some(domain) => self.modality_node(domain),
                None => {
                    let modality_id = self.modality_node(ModalityDomain::Other);
                    let sub_type_id = self.sub_type_node(key);
                    self.graph.add_edge(Edge::new(
                        &sub_type_id,
                        &modality_id,
                        Relationship::InstanceOf,
                    ));
                    sub_type_id
                }
            };
            self.graph
                .add_edge(prevalence_edge(&family_id, &edge_target, prevalence));
        }
    }

    #[must_use]
    pub fn build(self) -> Graph {
        self.graph
    }

    fn add_claim(&mut self, species_id: &str, claim: &SensoryClaim) {
        let modality_id = self.modality_node(claim.modality_domain);
        self.graph
            .add_edge(Edge::new(species_id, &modality_id, Relationship::HasSense));

        if claim.sub_type == claim.modality_domain.as_str() {
            return;
        }

        let sub_type_id = self.sub_type_node(&claim.sub_type);
        self.graph.add_edge(Edge::new(
            &sub_type_id,
            &modality_id,
            Relationship::InstanceOf,
        ));

        let mut edge = Edge::new(species_id, &sub_type_id, Relationship::HasSense);
        if let Some(value) = claim
            .quantitative_data
            .as_ref()
            .and_then(|q| serde_json::to_value(q).ok())
        {
            edge = edge.with_attribute("quantitative_data", value);
        }
        self.graph.add_edge(edge);
    }

    fn family_node(&mut self, name: &str) -> String {
        self.named_node(NodeKind::Family, name)
    }

    fn order_node(&mut self, name: &str) -> String {
        self.named_node(NodeKind::Order, name)
    }

    fn sub_type_node(&mut self, name: &str) -> String {
        self.named_node(NodeKind::SubType, name)
    }

    fn modality_node(&mut self, domain: ModalityDomain) -> String {
        self.named_node(NodeKind::Modality, domain.as_str())
    }

    fn named_node(&mut self, kind: NodeKind, name: &str) -> String {
        let name = collapse_whitespace(name);
        let node = Node::new(kind, &name, &name);
        let id = node.id.clone();
        self.graph.add_node(node);
        id
    }

    fn member_of(&mut self, source_id: &str, target_id: &str) {
        self.graph
            .add_edge(Edge::new(source_id, target_id, Relationship::MemberOf));
    }
}

fn prevalence_edge(source_id: &str, target_id: &str, prevalence: &ModalityPrevalence) -> Edge {
    let mut edge = Edge::new(source_id, target_id, Relationship::HasSense).with_attribute(
        "prevalence",
        serde_json::Value::String(prevalence.presence.as_str().to_string()),
    );
    if let Some(range) = prevalence
        .frequency_range
        .as_ref()
        .and_then(|r| serde_json::to_value(r).ok())
    {
        edge = edge.with_attribute("frequency_range", range);
    }
    edge
}

/// Build the full graph from keyed profiles.
///
/// Inputs are sorted by profile key first, so the result does not depend on
/// the order the store returned them in.
#[must_use]
pub fn build_graph(species: &[(String, SpeciesRecord)], families: &[(String, FamilyProfile)]) -> Graph {
    let mut species: Vec<_> = species.iter().collect();
    species.sort_by(|a, b| a.0.cmp(&b.0));
    let mut families: Vec<_> = families.iter().collect();
    families.sort_by(|a, b| a.0.cmp(&b.0));

    let mut builder = GraphBuilder::new();
    for (_, record) in species {
        builder.add_species(record);
    }
    for (_, profile) in families {
        builder.add_family(profile);
    }

    let graph = builder.build();
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built"
    );
    graph
}
