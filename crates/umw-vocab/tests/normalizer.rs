//! Record-level and graph-level normalization.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use umw_core::entities::*;
use umw_core::enums::*;
use umw_core::responses::NormalizeReport;
use umw_graph::Graph;
use umw_vocab::{Normalizer, Vocabulary};

fn claim(domain: ModalityDomain, sub_type: &str, data: Option<QuantitativeData>) -> SensoryClaim {
    SensoryClaim {
        modality_domain: domain,
        sub_type: sub_type.to_string(),
        stimulus_type: "Sound".to_string(),
        quantitative_data: data,
        mechanism: None,
        evidence: vec![],
    }
}

fn bat(claims: Vec<SensoryClaim>) -> SpeciesRecord {
    SpeciesRecord {
        identity: Identity {
            common_name: "Little Brown Bat".to_string(),
            scientific_name: "Myotis lucifugus".to_string(),
            stable_id: None,
            taxonomy: Taxonomy::default(),
            aliases: BTreeSet::new(),
        },
        claims,
        data_quality_flag: DataQualityFlag::InferredOnly,
    }
}

fn prevalence(presence: Presence, notes: &str, species: &[&str]) -> ModalityPrevalence {
    ModalityPrevalence {
        presence,
        notes: notes.to_string(),
        inferred_from_species: species.iter().map(|s| (*s).to_string()).collect(),
        frequency_range: None,
    }
}

#[test]
fn species_sub_types_and_units_are_normalized() {
    let record = bat(vec![
        claim(
            ModalityDomain::Mechanoreception,
            "hearing",
            Some(QuantitativeData {
                min: Some(5.0),
                max: Some(10.0),
                unit: Some("kHz".to_string()),
                context: None,
            }),
        ),
        claim(ModalityDomain::Mechanoreception, "  Echolocation  ", None),
    ]);

    let normalized = Normalizer::default().normalize_species(record);

    assert_eq!(normalized.claims[0].sub_type, "Mechanoreception");
    assert_eq!(
        normalized.claims[0].quantitative_data,
        Some(QuantitativeData {
            min: Some(5000.0),
            max: Some(10000.0),
            unit: Some("Hz".to_string()),
            context: None,
        })
    );
    assert_eq!(normalized.claims[1].sub_type, "Echolocation");
}

#[test]
fn species_normalization_is_idempotent() {
    let record = bat(vec![
        claim(
            ModalityDomain::Photoreception,
            "Color_Vision",
            Some(QuantitativeData {
                min: Some(0.35),
                max: Some(0.7),
                unit: Some("µm".to_string()),
                context: None,
            }),
        ),
        claim(ModalityDomain::Mechanoreception, "Echolocation", None),
    ]);
    let normalizer = Normalizer::default();
    let once = normalizer.normalize_species(record);
    let twice = normalizer.normalize_species(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn family_keys_collapse_with_merge_rule() {
    let profile = FamilyProfile {
        family_name: "Vespertilionidae".to_string(),
        stable_id: None,
        order_name: Some("Chiroptera".to_string()),
        modalities: BTreeMap::from([
            ("Hearing".to_string(), prevalence(Presence::Common, "Echolocation calls", &["Myotis lucifugus"])),
            ("audition".to_string(), prevalence(Presence::Rare, "Passive listening", &["Eptesicus fuscus"])),
            ("Infrared pit organs".to_string(), prevalence(Presence::Unknown, "", &[])),
        ]),
        sources: BTreeSet::new(),
        confidence: Confidence::Medium,
        generated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    };

    let normalized = Normalizer::default()
        .with_note_separator(" / ")
        .normalize_family(profile);

    assert_eq!(
        normalized.modalities.keys().collect::<Vec<_>>(),
        vec!["Infrared pit organs", "Mechanoreception"]
    );
    let mechano = &normalized.modalities["Mechanoreception"];
    assert_eq!(mechano.presence, Presence::Common);
    // BTreeMap order: "Hearing" < "audition"
    assert_eq!(mechano.notes, "Echolocation calls / Passive listening");
    assert_eq!(mechano.inferred_from_species.len(), 2);
}

/// A graph as an older build might have left it: label variants as separate
/// modality and sub_type nodes.
fn legacy_graph() -> Graph {
    let mut graph = Graph::new();
    graph.add_node(Node::new(NodeKind::Species, "Tyto alba", "Barn Owl"));
    graph.add_node(Node::new(NodeKind::Species, "Strix aluco", "Tawny Owl"));
    graph.add_node(Node {
        id: "modality:vision".to_string(),
        display_name: "vision".to_string(),
        kind: NodeKind::Modality,
    });
    graph.add_node(Node::new(NodeKind::SubType, "Vision", "Vision"));
    graph.add_node(Node::new(NodeKind::SubType, "UV sensitivity", "UV sensitivity"));
    graph.add_node(Node::new(NodeKind::Modality, "Photoreception", "Photoreception"));

    graph.add_edge(Edge::new("species:Tyto alba", "modality:vision", Relationship::HasSense));
    graph.add_edge(Edge::new(
        "species:Tyto alba",
        "modality:Photoreception",
        Relationship::HasSense,
    ));
    graph.add_edge(Edge::new("species:Strix aluco", "sub_type:Vision", Relationship::HasSense));
    graph.add_edge(Edge::new(
        "sub_type:Vision",
        "modality:Photoreception",
        Relationship::InstanceOf,
    ));
    graph.add_edge(Edge::new(
        "species:Strix aluco",
        "sub_type:UV sensitivity",
        Relationship::HasSense,
    ));
    graph.add_edge(Edge::new(
        "sub_type:UV sensitivity",
        "modality:Photoreception",
        Relationship::InstanceOf,
    ));
    graph
}

#[test]
fn graph_pass_collapses_synonym_nodes_without_dropping_edges() {
    let mut graph = legacy_graph();
    let report = Normalizer::default().normalize_graph(&mut graph);

    assert_eq!(
        report,
        NormalizeReport {
            nodes_rewritten: 2,
            nodes_removed: 2,
            edges_redirected: 3,
            edges_collapsed: 2,
        }
    );
    assert!(graph.node("modality:vision").is_none());
    assert!(graph.node("sub_type:Vision").is_none());
    assert!(graph.node("sub_type:UV sensitivity").is_some());
    assert_eq!(graph.nodes_of_kind(NodeKind::Modality).count(), 1);

    // Both owls keep a HAS_SENSE edge to the canonical node.
    assert!(graph.has_edge("species:Tyto alba", "modality:Photoreception", Relationship::HasSense));
    assert!(graph.has_edge("species:Strix aluco", "modality:Photoreception", Relationship::HasSense));
    assert!(graph.has_edge(
        "species:Strix aluco",
        "sub_type:UV sensitivity",
        Relationship::HasSense
    ));
    assert!(!graph.edges().any(|e| e.source_id == e.target_id));
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn graph_pass_is_idempotent() {
    let normalizer = Normalizer::default();
    let mut graph = legacy_graph();
    normalizer.normalize_graph(&mut graph);
    let after_first = graph.clone();

    let report = normalizer.normalize_graph(&mut graph);

    assert_eq!(report, NormalizeReport::default());
    assert_eq!(graph, after_first);
}

#[test]
fn configured_vocabulary_is_used_by_graph_pass() {
    let extras = BTreeMap::from([("UV sensitivity".to_string(), "Photoreception".to_string())]);
    let vocabulary = Vocabulary::builtin().with_synonyms(&extras).unwrap();
    let mut graph = legacy_graph();

    let report = Normalizer::new(vocabulary).normalize_graph(&mut graph);

    assert_eq!(report.nodes_rewritten, 3);
    assert_eq!(graph.nodes_of_kind(NodeKind::SubType).count(), 0);
}
