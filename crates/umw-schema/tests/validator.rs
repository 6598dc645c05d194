//! Candidate validation: repairs that are allowed and violations that are not.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use umw_core::entities::QuantitativeData;
use umw_core::enums::*;
use umw_core::identity::IdentityHint;
use umw_schema::Validator;

fn shark_hint() -> IdentityHint {
    IdentityHint::named("Great White Shark")
}

fn shark_candidate() -> serde_json::Value {
    json!({
        "identity": {
            "common_name": "Great White Shark",
            "scientific_name": "Carcharodon carcharias",
            "taxonomy": {"class": "Elasmobranchii", "order": "Lamniformes", "family": "Lamnidae"}
        },
        "sensory_modalities": [{
            "modality_domain": "Electroreception",
            "sub_type": "Ampullae of Lorenzini",
            "stimulus_type": "Electric field",
            "quantitative_data": {"min": "5", "max": null, "unit": "nV/cm"},
            "mechanism": {"level": "Molecular", "description": "Voltage-gated channels"},
            "evidence": [{
                "source_type": "Primary Study",
                "source_name": "Kalmijn",
                "year": 1971,
                "citation": "Kalmijn, A. J. (1971). The electric sense of sharks and rays."
            }]
        }],
        "meta": {"data_quality_flag": "High_Evidence"}
    })
}

#[test]
fn parses_complete_species_record() {
    let record = Validator::parse_species(&shark_candidate(), &shark_hint()).unwrap();

    assert_eq!(record.identity.scientific_name, "Carcharodon carcharias");
    assert_eq!(record.identity.taxonomy.order, "Lamniformes");
    assert_eq!(record.data_quality_flag, DataQualityFlag::HighEvidence);
    assert_eq!(record.claims.len(), 1);

    let claim = &record.claims[0];
    assert_eq!(claim.modality_domain, ModalityDomain::Electroreception);
    assert_eq!(
        claim.quantitative_data,
        Some(QuantitativeData {
            min: Some(5.0),
            max: None,
            unit: Some("nV/cm".into()),
            context: None,
        })
    );
    assert_eq!(
        claim.mechanism.as_ref().map(|m| m.level),
        Some(MechanismLevel::Genetic)
    );
    assert_eq!(claim.evidence[0].year, Some(1971));
}

#[test]
fn missing_names_are_filled_from_hint() {
    let raw = json!({"sensory_modalities": []});
    let record = Validator::parse_species(&raw, &shark_hint()).unwrap();
    assert_eq!(record.identity.common_name, "Great White Shark");
    assert_eq!(record.identity.scientific_name, "Great White Shark");
    assert_eq!(record.data_quality_flag, DataQualityFlag::LowData);
}

#[test]
fn unnamed_record_is_rejected() {
    let err = Validator::parse_species(&json!({}), &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "identity.common_name");
    assert_eq!(err.constraint, "required");
    assert_eq!(err.entity, "<unnamed>");
}

#[test]
fn taxonomy_is_coerced_and_defaulted() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl", "taxonomy": {"class": 7, "order": null}}
    });
    let record = Validator::parse_species(&raw, &IdentityHint::default()).unwrap();
    assert_eq!(record.identity.taxonomy.class, "7");
    assert_eq!(record.identity.taxonomy.order, "Unknown");
    assert_eq!(record.identity.taxonomy.family, "Unknown");
}

#[test]
fn synonyms_are_remapped_before_checking() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl", "scientific_name": "Tyto alba"},
        "claims": [
            {"modality_domain": "Vision", "sub_type": "Low-light vision"},
            {"modality_domain": "hearing", "sub_type": "Sound localisation",
             "mechanism": {"level": "Not specified"}}
        ],
        "data_quality_flag": "Low_Evidence"
    });
    let record = Validator::parse_species(&raw, &IdentityHint::default()).unwrap();
    assert_eq!(record.claims[0].modality_domain, ModalityDomain::Photoreception);
    assert_eq!(record.claims[1].modality_domain, ModalityDomain::Mechanoreception);
    assert_eq!(
        record.claims[1].mechanism.as_ref().map(|m| m.level),
        Some(MechanismLevel::Unspecified)
    );
    assert_eq!(record.data_quality_flag, DataQualityFlag::LowData);
}

#[test]
fn unmappable_modality_names_the_field() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [
            {"modality_domain": "Vision"},
            {"modality_domain": "Vision"},
            {"modality_domain": "Telepathy"}
        ]
    });
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.entity, "Barn Owl");
    assert_eq!(err.field, "sensory_modalities[2].modality_domain");
}

#[test]
fn inverted_bounds_are_rejected() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [
            {"modality_domain": "Mechanoreception", "sub_type": "Hearing"},
            {"modality_domain": "Mechanoreception", "sub_type": "Hearing"},
            {"modality_domain": "Mechanoreception",
             "quantitative_data": {"min": 12000, "max": 200, "unit": "Hz"}}
        ]
    });
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "sensory_modalities[2].quantitative_data.max");
    assert!(err.constraint.starts_with("must be >= min"));
}

#[test]
fn empty_quantitative_block_is_dropped() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [{
            "modality_domain": "Photoreception",
            "quantitative_data": {"min": null, "max": null, "unit": "nm"}
        }]
    });
    let record = Validator::parse_species(&raw, &IdentityHint::default()).unwrap();
    assert_eq!(record.claims[0].quantitative_data, None);
}

#[rstest]
#[case(json!({"min": 1e300, "max": 1e301, "unit": "GHz"}), "sensory_modalities[0].quantitative_data.min")]
#[case(json!({"min": 5, "max": 1e305, "unit": "m"}), "sensory_modalities[0].quantitative_data.max")]
fn bounds_overflowing_the_base_unit_are_rejected(#[case] block: serde_json::Value, #[case] field: &str) {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [{"modality_domain": "Mechanoreception", "quantitative_data": block}]
    });
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, field);
    assert!(err.constraint.starts_with("out of range once converted"));
}

#[test]
fn large_bounds_in_a_base_unit_are_kept() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [{
            "modality_domain": "Mechanoreception",
            "quantitative_data": {"min": 1e300, "max": 1e301, "unit": "Hz"}
        }]
    });
    let record = Validator::parse_species(&raw, &IdentityHint::default()).unwrap();
    let data = record.claims[0].quantitative_data.as_ref().unwrap();
    assert_eq!(data.max, Some(1e301));
}

#[rstest]
#[case(json!({"min": "abc"}), "sensory_modalities[0].quantitative_data.min")]
#[case(json!({"max": [1]}), "sensory_modalities[0].quantitative_data.max")]
#[case(json!("12 Hz"), "sensory_modalities[0].quantitative_data")]
fn malformed_quantitative_data_is_rejected(#[case] block: serde_json::Value, #[case] field: &str) {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [{"modality_domain": "Photoreception", "quantitative_data": block}]
    });
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, field);
}

#[test]
fn evidence_citation_is_derived_or_rejected() {
    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [{
            "modality_domain": "Mechanoreception",
            "evidence": [
                {"source_name": "Konishi", "year": "1973"},
                {"url": "https://example.org/owl"}
            ]
        }]
    });
    let record = Validator::parse_species(&raw, &IdentityHint::default()).unwrap();
    let evidence = &record.claims[0].evidence;
    assert_eq!(evidence[0].citation, "Konishi (1973)");
    assert_eq!(evidence[0].source_type, "Unknown");
    assert_eq!(evidence[1].citation, "https://example.org/owl");
    assert_eq!(evidence[1].source_name, "Unknown");

    let raw = json!({
        "identity": {"common_name": "Barn Owl"},
        "sensory_modalities": [{
            "modality_domain": "Mechanoreception",
            "evidence": [{"note": "no provenance"}]
        }]
    });
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "sensory_modalities[0].evidence[0].citation");
}

#[rstest]
#[case(json!({"identity": {"common_name": "Shark", "stable_id": 11}}), Some(11))]
#[case(json!({"identity": {"common_name": "Shark", "gbif_id": "12"}}), Some(12))]
#[case(json!({"identity": {"common_name": "Shark"}, "gbif_id": 13}), Some(13))]
#[case(json!({"identity": {"common_name": "Shark"}, "stable_id": "14"}), Some(14))]
#[case(json!({"identity": {"common_name": "Shark"}}), None)]
fn stable_id_sources(#[case] raw: serde_json::Value, #[case] expected: Option<u64>) {
    let record = Validator::parse_species(&raw, &IdentityHint::default()).unwrap();
    assert_eq!(record.identity.stable_id, expected);
}

#[test]
fn hint_stable_id_wins() {
    let raw = json!({"identity": {"common_name": "Shark", "gbif_id": 12}});
    let hint = IdentityHint::named("Shark").with_stable_id(2_420_694);
    let record = Validator::parse_species(&raw, &hint).unwrap();
    assert_eq!(record.identity.stable_id, Some(2_420_694));
}

#[test]
fn negative_stable_id_is_rejected() {
    let raw = json!({"identity": {"common_name": "Shark", "gbif_id": -3}});
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "identity.gbif_id");
}

#[rstest]
#[case(json!({"identity": {"common_name": "Shark", "gbif_id": "18446744073709551615"}}), "identity.gbif_id")]
#[case(json!({"identity": {"common_name": "Shark"}, "stable_id": 9_223_372_036_854_775_808_u64}), "stable_id")]
fn stable_id_beyond_store_range_is_rejected(#[case] raw: serde_json::Value, #[case] field: &str) {
    let err = Validator::parse_species(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, field);
    assert!(err.constraint.contains("9223372036854775807"));
}

#[test]
fn hint_stable_id_beyond_store_range_is_rejected() {
    let raw = json!({"family_name": "Lamnidae"});
    let hint = IdentityHint::named("Lamnidae").with_stable_id(u64::MAX);
    let err = Validator::parse_family(&raw, &hint).unwrap_err();
    assert_eq!(err.field, "stable_id");
}

#[test]
fn non_object_candidate_is_rejected() {
    let err = Validator::parse_species(&json!([1, 2]), &shark_hint()).unwrap_err();
    assert_eq!(err.field, "$");
    assert_eq!(err.entity, "Great White Shark");
}

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

#[test]
fn representatives_seed_unattributed_modalities() {
    let raw = json!({
        "family_name": "Lamnidae",
        "modalities": {
            "Electroreception": {"presence": "common"},
            "Mechanoreception": {"presence": "common", "inferred_from_species": ["Isurus oxyrinchus"]}
        }
    });
    let hint = IdentityHint::named("Lamnidae")
        .with_representatives(["Carcharodon carcharias", "  Lamna  nasus "]);
    let profile = Validator::parse_family(&raw, &hint).unwrap();

    let seeded: Vec<&str> = profile.modalities["Electroreception"]
        .inferred_from_species
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(seeded, vec!["Carcharodon carcharias", "Lamna nasus"]);
    let named: Vec<&str> = profile.modalities["Mechanoreception"]
        .inferred_from_species
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(named, vec!["Isurus oxyrinchus"]);
}

#[test]
fn parses_family_profile_with_defaults() {
    let raw = json!({
        "sensory_modalities": {
            "Mechanoreception": {
                "presence": "Common",
                "notes": "Lateral line",
                "inferred_from_species": ["Carcharodon carcharias"],
                "frequency_range_hz": {"min": 20, "max": "1500"}
            },
            "vision": {}
        },
        "sources": ["https://en.wikipedia.org/wiki/Lamnidae"]
    });
    let hint = IdentityHint::named("Lamnidae")
        .with_stable_id(8)
        .with_order("Lamniformes");

    let profile = Validator::parse_family(&raw, &hint).unwrap();

    assert_eq!(profile.family_name, "Lamnidae");
    assert_eq!(profile.stable_id, Some(8));
    assert_eq!(profile.order_name.as_deref(), Some("Lamniformes"));
    assert_eq!(profile.confidence, Confidence::Low);
    assert_eq!(profile.sources.len(), 1);

    let mechano = &profile.modalities["Mechanoreception"];
    assert_eq!(mechano.presence, Presence::Common);
    assert_eq!(
        mechano.frequency_range.and_then(|r| r.max),
        Some(1500.0)
    );
    assert_eq!(profile.modalities["vision"].presence, Presence::Unknown);
}

#[test]
fn family_order_from_record_beats_hint() {
    let raw = json!({"family_name": "Tytonidae", "order_name": "Strigiformes", "confidence": "high"});
    let hint = IdentityHint::named("Tytonidae").with_order("Unknown");
    let profile = Validator::parse_family(&raw, &hint).unwrap();
    assert_eq!(profile.order_name.as_deref(), Some("Strigiformes"));
    assert_eq!(profile.confidence, Confidence::High);
}

#[test]
fn family_inverted_frequency_range_is_rejected() {
    let raw = json!({
        "family_name": "Tytonidae",
        "modalities": {"Mechanoreception": {"frequency_range": {"min": 9000, "max": 200}}}
    });
    let err = Validator::parse_family(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "modalities.Mechanoreception.frequency_range.max");
}

#[test]
fn family_without_name_is_rejected() {
    let err = Validator::parse_family(&json!({}), &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "family_name");
}

#[test]
fn family_bad_presence_and_timestamp_are_rejected() {
    let raw = json!({"family_name": "Tytonidae", "modalities": {"Photoreception": {"presence": "often"}}});
    let err = Validator::parse_family(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "modalities.Photoreception.presence");

    let raw = json!({"family_name": "Tytonidae", "generated_at": "last week"});
    let err = Validator::parse_family(&raw, &IdentityHint::default()).unwrap_err();
    assert_eq!(err.field, "generated_at");
}

#[test]
fn family_generated_at_is_parsed() {
    let raw = json!({"family_name": "Tytonidae", "generated_at": "2025-11-02T09:30:00Z"});
    let profile = Validator::parse_family(&raw, &IdentityHint::default()).unwrap();
    assert_eq!(profile.generated_at.to_rfc3339(), "2025-11-02T09:30:00+00:00");
}
