//! Merge rules for species records and family profiles.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use umw_core::entities::*;
use umw_core::enums::*;
use umw_merge::{merge_family, merge_species, seed_family, seed_species};

fn evidence(citation: &str) -> Evidence {
    Evidence {
        source_type: "Paper".to_string(),
        source_name: "Journal".to_string(),
        citation: citation.to_string(),
        url: None,
        note: None,
        year: None,
        title: None,
        author: None,
    }
}

fn claim(domain: ModalityDomain, sub_type: &str, citations: &[&str]) -> SensoryClaim {
    SensoryClaim {
        modality_domain: domain,
        sub_type: sub_type.to_string(),
        stimulus_type: "Unknown".to_string(),
        quantitative_data: None,
        mechanism: None,
        evidence: citations.iter().map(|c| evidence(c)).collect(),
    }
}

fn shark(common: &str, claims: Vec<SensoryClaim>) -> SpeciesRecord {
    SpeciesRecord {
        identity: Identity {
            common_name: common.to_string(),
            scientific_name: "Carcharodon carcharias".to_string(),
            stable_id: Some(2_420_694),
            taxonomy: Taxonomy::default(),
            aliases: BTreeSet::new(),
        },
        claims,
        data_quality_flag: DataQualityFlag::LowData,
    }
}

/// Claims keyed by slot with evidence citations sorted, for order-insensitive
/// comparison.
fn claim_set(record: &SpeciesRecord) -> BTreeMap<(ModalityDomain, String), BTreeSet<String>> {
    record
        .claims
        .iter()
        .map(|c| {
            (
                (c.modality_domain, c.sub_type.clone()),
                c.evidence.iter().map(|e| e.citation.clone()).collect(),
            )
        })
        .collect()
}

#[test]
fn merging_same_record_twice_is_idempotent() {
    let incoming = shark(
        "Great White Shark",
        vec![claim(ModalityDomain::Electroreception, "Ampullae of Lorenzini", &["Kalmijn (1971)"])],
    );
    let (mut stored, _) = seed_species(&incoming);

    let first = merge_species(&mut stored, &incoming);
    let after_once = stored.clone();
    let second = merge_species(&mut stored, &incoming);

    assert_eq!(stored, after_once);
    assert!(first.is_noop());
    assert!(second.is_noop());
    assert_eq!(stored.claims.len(), 1);
    assert_eq!(stored.claims[0].evidence.len(), 1);
}

#[test]
fn merge_order_does_not_change_claim_set() {
    let a = shark(
        "Great White Shark",
        vec![
            claim(ModalityDomain::Electroreception, "Electroreception", &["Kalmijn (1971)"]),
            claim(ModalityDomain::Chemoreception, "Olfactory rosettes", &["Meredith (2010)"]),
        ],
    );
    let b = shark(
        "White Pointer",
        vec![
            claim(ModalityDomain::Electroreception, "Electroreception", &["Kalmijn (1971)", "Kajiura (2002)"]),
            claim(ModalityDomain::Mechanoreception, "Mechanoreception", &["Bleckmann (2009)"]),
        ],
    );

    let (mut ab, _) = seed_species(&a);
    merge_species(&mut ab, &b);
    let (mut ba, _) = seed_species(&b);
    merge_species(&mut ba, &a);

    assert_eq!(claim_set(&ab), claim_set(&ba));
    assert_eq!(ab.claims.len(), 3);
}

#[test]
fn shared_citation_is_kept_once() {
    let (mut stored, _) = seed_species(&shark(
        "Great White Shark",
        vec![claim(ModalityDomain::Electroreception, "Electroreception", &["Kalmijn (1971)"])],
    ));
    let outcome = merge_species(
        &mut stored,
        &shark(
            "Great White Shark",
            vec![claim(
                ModalityDomain::Electroreception,
                "Electroreception",
                &["Kalmijn (1971)", "Kajiura (2002)"],
            )],
        ),
    );

    let citations: Vec<_> = stored.claims[0].evidence.iter().map(|e| e.citation.as_str()).collect();
    assert_eq!(citations, vec!["Kalmijn (1971)", "Kajiura (2002)"]);
    assert_eq!(outcome.evidence_added, 1);
    assert_eq!(outcome.claims_added, 0);
}

#[test]
fn seed_folds_duplicate_slots_in_one_record() {
    let incoming = shark(
        "Great White Shark",
        vec![
            claim(ModalityDomain::Photoreception, "Photoreception", &["A"]),
            claim(ModalityDomain::Photoreception, "Photoreception", &["A", "B"]),
        ],
    );
    let (stored, outcome) = seed_species(&incoming);
    assert_eq!(stored.claims.len(), 1);
    assert_eq!(stored.claims[0].evidence.len(), 2);
    assert_eq!(outcome.claims_added, 1);
    assert_eq!(outcome.evidence_added, 2);
}

#[test]
fn more_data_wins_without_overwriting() {
    let (mut stored, _) = seed_species(&shark(
        "Great White Shark",
        vec![claim(ModalityDomain::Mechanoreception, "Hearing range", &[])],
    ));

    let mut richer = claim(ModalityDomain::Mechanoreception, "Hearing range", &[]);
    richer.stimulus_type = "Pressure wave".to_string();
    richer.quantitative_data = Some(QuantitativeData {
        min: Some(20.0),
        max: Some(1500.0),
        unit: Some("Hz".to_string()),
        context: None,
    });
    richer.mechanism = Some(Mechanism {
        level: MechanismLevel::Anatomical,
        description: "Inner ear".to_string(),
    });
    let outcome = merge_species(&mut stored, &shark("Great White Shark", vec![richer.clone()]));
    assert_eq!(outcome.quantitative_adopted, 1);
    assert_eq!(stored.claims[0], richer);

    let mut later = richer.clone();
    later.quantitative_data = Some(QuantitativeData {
        min: Some(10.0),
        max: Some(800.0),
        unit: Some("Hz".to_string()),
        context: None,
    });
    later.stimulus_type = "Vibration".to_string();
    merge_species(&mut stored, &shark("Great White Shark", vec![later]));
    assert_eq!(stored.claims[0], richer);
}

fn block(min: Option<f64>, max: Option<f64>, unit: Option<&str>) -> QuantitativeData {
    QuantitativeData {
        min,
        max,
        unit: unit.map(str::to_string),
        context: None,
    }
}

#[rstest]
#[case::complete_beats_partial(
    block(Some(20.0), None, Some("Hz")),
    block(Some(10.0), Some(800.0), Some("Hz")),
    block(Some(10.0), Some(800.0), Some("Hz"))
)]
#[case::tie_goes_to_greater_min(
    block(Some(20.0), Some(1500.0), Some("Hz")),
    block(Some(10.0), Some(3000.0), Some("Hz")),
    block(Some(20.0), Some(1500.0), Some("Hz"))
)]
#[case::tie_goes_to_greater_max(
    block(Some(20.0), Some(1500.0), Some("Hz")),
    block(Some(20.0), Some(800.0), Some("Hz")),
    block(Some(20.0), Some(1500.0), Some("Hz"))
)]
fn competing_quantitative_blocks_merge_the_same_either_way(
    #[case] first: QuantitativeData,
    #[case] second: QuantitativeData,
    #[case] kept: QuantitativeData,
) {
    let with_block = |q: &QuantitativeData| {
        let mut c = claim(ModalityDomain::Mechanoreception, "Hearing range", &[]);
        c.quantitative_data = Some(q.clone());
        shark("Great White Shark", vec![c])
    };
    let (a, b) = (with_block(&first), with_block(&second));

    let (mut ab, _) = seed_species(&a);
    merge_species(&mut ab, &b);
    let (mut ba, _) = seed_species(&b);
    merge_species(&mut ba, &a);

    assert_eq!(ab.claims[0].quantitative_data, Some(kept.clone()));
    assert_eq!(ba.claims[0].quantitative_data, Some(kept));
}

#[test]
fn equal_block_is_not_adopted_again() {
    let mut c = claim(ModalityDomain::Mechanoreception, "Hearing range", &[]);
    c.quantitative_data = Some(block(Some(20.0), Some(1500.0), Some("Hz")));
    let record = shark("Great White Shark", vec![c]);
    let (mut stored, _) = seed_species(&record);

    let outcome = merge_species(&mut stored, &record);

    assert_eq!(outcome.quantitative_adopted, 0);
    assert!(outcome.is_noop());
}

#[test]
fn identity_gains_aliases_and_fills_unknowns() {
    let (mut stored, _) = seed_species(&shark("Great White Shark", vec![]));
    stored.identity.stable_id = None;

    let mut incoming = shark("White Pointer", vec![]);
    incoming.identity.taxonomy.order = "Lamniformes".to_string();
    incoming.identity.aliases.insert("White Death".to_string());
    incoming.data_quality_flag = DataQualityFlag::HighEvidence;

    let outcome = merge_species(&mut stored, &incoming);

    assert_eq!(stored.identity.common_name, "Great White Shark");
    assert_eq!(
        stored.identity.aliases,
        BTreeSet::from(["White Death".to_string(), "White Pointer".to_string()])
    );
    assert_eq!(outcome.aliases_added, 2);
    assert_eq!(stored.identity.stable_id, Some(2_420_694));
    assert_eq!(stored.identity.taxonomy.order, "Lamniformes");
    assert_eq!(stored.identity.taxonomy.family, "Unknown");
    assert_eq!(stored.data_quality_flag, DataQualityFlag::HighEvidence);
}

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

fn lamnidae(modalities: &[(&str, Presence, &str)], sources: &[&str], confidence: Confidence) -> FamilyProfile {
    FamilyProfile {
        family_name: "Lamnidae".to_string(),
        stable_id: None,
        order_name: None,
        modalities: modalities
            .iter()
            .map(|(name, presence, notes)| {
                (
                    (*name).to_string(),
                    ModalityPrevalence {
                        presence: *presence,
                        notes: (*notes).to_string(),
                        ..ModalityPrevalence::default()
                    },
                )
            })
            .collect(),
        sources: sources.iter().map(|s| (*s).to_string()).collect(),
        confidence,
        generated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn family_merge_unions_and_ratchets() {
    let (mut stored, seeded) = seed_family(&lamnidae(
        &[("Electroreception", Presence::Rare, "Ampullae present")],
        &["wiki/Lamnidae"],
        Confidence::High,
    ));
    assert_eq!(seeded.modalities_added, 1);

    let mut incoming = lamnidae(
        &[
            ("Electroreception", Presence::Common, "Highly sensitive"),
            ("Mechanoreception", Presence::Common, "Lateral line"),
        ],
        &["wiki/Lamnidae", "wiki/Carcharodon_carcharias"],
        Confidence::Low,
    );
    incoming.stable_id = Some(8);
    incoming.order_name = Some("Lamniformes".to_string());
    incoming.generated_at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

    let outcome = merge_family(&mut stored, &incoming, " | ");

    let electro = &stored.modalities["Electroreception"];
    assert_eq!(electro.presence, Presence::Common);
    assert_eq!(electro.notes, "Ampullae present | Highly sensitive");
    assert_eq!(stored.modalities.len(), 2);
    assert_eq!(stored.sources.len(), 2);
    assert_eq!(stored.stable_id, Some(8));
    assert_eq!(stored.order_name.as_deref(), Some("Lamniformes"));
    assert_eq!(stored.confidence, Confidence::Low);
    assert_eq!(stored.generated_at, incoming.generated_at);
    assert_eq!(outcome.modalities_added, 1);
    assert_eq!(outcome.presence_upgrades, 1);
    assert_eq!(outcome.notes_appended, 1);
    assert_eq!(outcome.sources_added, 1);
}

#[test]
fn family_presence_never_downgrades_and_scalars_stick() {
    let mut stored = lamnidae(&[("Photoreception", Presence::Common, "")], &[], Confidence::Medium);
    stored.order_name = Some("Lamniformes".to_string());

    let mut incoming = lamnidae(&[("Photoreception", Presence::Unknown, "")], &[], Confidence::Medium);
    incoming.order_name = Some("Carcharhiniformes".to_string());

    let outcome = merge_family(&mut stored, &incoming, " | ");

    assert_eq!(stored.modalities["Photoreception"].presence, Presence::Common);
    assert_eq!(stored.order_name.as_deref(), Some("Lamniformes"));
    assert!(outcome.is_noop());
}

#[rstest]
#[case(Presence::Unknown, Presence::Rare, Presence::Rare, 1)]
#[case(Presence::Unknown, Presence::Common, Presence::Common, 1)]
#[case(Presence::Rare, Presence::Common, Presence::Common, 1)]
#[case(Presence::Rare, Presence::Unknown, Presence::Rare, 0)]
#[case(Presence::Common, Presence::Rare, Presence::Common, 0)]
#[case(Presence::Common, Presence::Common, Presence::Common, 0)]
fn presence_ratchet(
    #[case] stored: Presence,
    #[case] incoming: Presence,
    #[case] expected: Presence,
    #[case] upgrades: u32,
) {
    let mut profile = lamnidae(&[("Thermoreception", stored, "")], &[], Confidence::Low);
    let outcome = merge_family(
        &mut profile,
        &lamnidae(&[("Thermoreception", incoming, "")], &[], Confidence::Low),
        " | ",
    );
    assert_eq!(profile.modalities["Thermoreception"].presence, expected);
    assert_eq!(outcome.presence_upgrades, upgrades);
}

#[test]
fn family_merge_is_idempotent() {
    let incoming = lamnidae(
        &[("Electroreception", Presence::Rare, "Ampullae present")],
        &["wiki/Lamnidae"],
        Confidence::High,
    );
    let (mut stored, _) = seed_family(&incoming);
    merge_family(&mut stored, &incoming, " | ");
    let once = stored.clone();
    merge_family(&mut stored, &incoming, " | ");
    assert_eq!(stored, once);
    assert_eq!(stored, incoming);
}
