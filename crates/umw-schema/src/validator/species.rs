use std::collections::BTreeSet;

use serde_json::Value;
use umw_core::entities::{
    Evidence, Identity, Mechanism, QuantitativeData, SensoryClaim, SpeciesRecord, Taxonomy,
};
use umw_core::enums::{DataQualityFlag, MechanismLevel};
use umw_core::identity::IdentityHint;
use umw_core::ids::{UNKNOWN, collapse_whitespace, is_known};
use umw_core::units::conversion_for;

use super::{Scope, bounds, coerce, stable_id, synonyms};
use crate::error::SchemaViolation;

const CLAIM_KEYS: &[&str] = &["sensory_modalities", "claims"];

pub fn parse(raw: &Value, hint: &IdentityHint) -> Result<SpeciesRecord, SchemaViolation> {
    let scope = Scope::new(
        raw,
        hint,
        &[
            &["identity", "common_name"],
            &["identity", "scientific_name"],
        ],
    );
    scope.require_object(raw, "$")?;

    let identity = parse_identity(&scope, raw, hint)?;

    let claims = match coerce::first(raw, CLAIM_KEYS) {
        None => Vec::new(),
        Some((key, Value::Array(items))) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_claim(&scope, item, &format!("{key}[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some((key, _)) => return Err(scope.violation(key, "must be an array")),
    };

    let quality = raw
        .get("meta")
        .and_then(|m| m.get("data_quality_flag"))
        .map(|v| ("meta.data_quality_flag", v))
        .or_else(|| raw.get("data_quality_flag").map(|v| ("data_quality_flag", v)));
    let data_quality_flag = match quality {
        None => DataQualityFlag::default(),
        Some((path, value)) => match coerce::text(Some(value)) {
            None => DataQualityFlag::default(),
            Some(label) => synonyms::data_quality_flag(&label).ok_or_else(|| {
                scope.violation(path, format!("unknown data quality flag {label:?}"))
            })?,
        },
    };

    Ok(SpeciesRecord {
        identity,
        claims,
        data_quality_flag,
    })
}

fn parse_identity(
    scope: &Scope,
    raw: &Value,
    hint: &IdentityHint,
) -> Result<Identity, SchemaViolation> {
    let empty = Value::Null;
    let identity = raw.get("identity").unwrap_or(&empty);
    if !identity.is_null() {
        scope.require_object(identity, "identity")?;
    }

    let name = |key: &str| coerce::text(identity.get(key)).map(|n| collapse_whitespace(&n));
    let hinted = hint.display_name().map(collapse_whitespace);

    let common = name("common_name");
    let scientific = name("scientific_name");
    let (common_name, scientific_name) = match (common, scientific, hinted) {
        (Some(c), Some(s), _) => (c, s),
        (Some(c), None, h) => {
            let s = h.unwrap_or_else(|| c.clone());
            (c, s)
        }
        (None, Some(s), h) => {
            let c = h.unwrap_or_else(|| s.clone());
            (c, s)
        }
        (None, None, Some(h)) => (h.clone(), h),
        (None, None, None) => return Err(scope.violation("identity.common_name", "required")),
    };

    let taxonomy = identity.get("taxonomy").unwrap_or(&empty);
    if !taxonomy.is_null() {
        scope.require_object(taxonomy, "identity.taxonomy")?;
    }
    let rank = |keys: &[&'static str]| {
        coerce::first(taxonomy, keys)
            .and_then(|(_, v)| coerce::text(Some(v)))
            .unwrap_or_else(|| UNKNOWN.to_string())
    };
    let taxonomy = Taxonomy {
        class: rank(&["class", "class_"]),
        order: rank(&["order"]),
        family: rank(&["family"]),
    };

    let stable_id = stable_id(
        scope,
        hint,
        &[
            ("identity.stable_id", identity.get("stable_id")),
            ("identity.gbif_id", identity.get("gbif_id")),
            ("gbif_id", raw.get("gbif_id")),
            ("stable_id", raw.get("stable_id")),
        ],
    )?;

    let mut aliases: BTreeSet<String> = coerce::text_list(identity.get("aliases"))
        .map_err(|c| scope.violation("identity.aliases", c))?
        .into_iter()
        .map(|a| collapse_whitespace(&a))
        .collect();
    aliases.remove(&common_name);
    aliases.remove(&scientific_name);

    Ok(Identity {
        common_name,
        scientific_name,
        stable_id,
        taxonomy,
        aliases,
    })
}

fn parse_claim(scope: &Scope, item: &Value, path: &str) -> Result<SensoryClaim, SchemaViolation> {
    scope.require_object(item, path)?;

    let domain_path = format!("{path}.modality_domain");
    let label = coerce::text(item.get("modality_domain"))
        .ok_or_else(|| scope.violation(&domain_path, "required"))?;
    let modality_domain = synonyms::modality_domain(&label)
        .ok_or_else(|| scope.violation(&domain_path, format!("unknown modality {label:?}")))?;

    let sub_type = coerce::text(item.get("sub_type"))
        .map(|s| collapse_whitespace(&s))
        .unwrap_or_else(|| modality_domain.as_str().to_string());
    let stimulus_type = coerce::text(item.get("stimulus_type"))
        .map(|s| collapse_whitespace(&s))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let quantitative_data = match item.get("quantitative_data") {
        None | Some(Value::Null) => None,
        Some(block) => {
            let block_path = format!("{path}.quantitative_data");
            scope.require_object(block, &block_path)?;
            let (min, max) = bounds(scope, block, &block_path)?;
            let unit = coerce::text(block.get("unit"));
            check_base_unit_range(scope, &block_path, min, max, unit.as_deref())?;
            let data = QuantitativeData {
                min,
                max,
                unit,
                context: coerce::text(block.get("context")),
            };
            (!data.is_empty()).then_some(data)
        }
    };

    let mechanism = match item.get("mechanism") {
        None | Some(Value::Null) => None,
        Some(block) => Some(parse_mechanism(scope, block, &format!("{path}.mechanism"))?),
    };

    let evidence = match item.get("evidence") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(j, e)| parse_evidence(scope, e, &format!("{path}.evidence[{j}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(scope.violation(format!("{path}.evidence"), "must be an array")),
    };

    Ok(SensoryClaim {
        modality_domain,
        sub_type,
        stimulus_type,
        quantitative_data,
        mechanism,
        evidence,
    })
}

/// The normalizer multiplies bounds into the base unit, so they must stay
/// finite after conversion.
fn check_base_unit_range(
    scope: &Scope,
    path: &str,
    min: Option<f64>,
    max: Option<f64>,
    unit: Option<&str>,
) -> Result<(), SchemaViolation> {
    let Some((factor, base)) = unit.and_then(conversion_for) else {
        return Ok(());
    };
    for (key, value) in [("min", min), ("max", max)] {
        if value.is_some_and(|v| !(v * factor).is_finite()) {
            return Err(scope.violation(
                format!("{path}.{key}"),
                format!("out of range once converted to {base}"),
            ));
        }
    }
    Ok(())
}

fn parse_mechanism(scope: &Scope, block: &Value, path: &str) -> Result<Mechanism, SchemaViolation> {
    scope.require_object(block, path)?;
    let level = match coerce::text(block.get("level")) {
        None => MechanismLevel::Unknown,
        Some(label) => synonyms::mechanism_level(&label).ok_or_else(|| {
            scope.violation(
                format!("{path}.level"),
                format!("unknown mechanism level {label:?}"),
            )
        })?,
    };
    Ok(Mechanism {
        level,
        description: coerce::text(block.get("description")).unwrap_or_default(),
    })
}

fn parse_evidence(scope: &Scope, item: &Value, path: &str) -> Result<Evidence, SchemaViolation> {
    scope.require_object(item, path)?;

    let source_name = coerce::text(item.get("source_name"));
    let url = coerce::text(item.get("url"));
    let year = coerce::year(item.get("year")).map_err(|c| scope.violation(format!("{path}.year"), c))?;

    let citation = match coerce::text(item.get("citation")) {
        Some(citation) => citation,
        None => derive_citation(source_name.as_deref(), year, url.as_deref()).ok_or_else(|| {
            scope.violation(
                format!("{path}.citation"),
                "required (no source_name or url to derive it from)",
            )
        })?,
    };

    Ok(Evidence {
        source_type: coerce::text(item.get("source_type")).unwrap_or_else(|| UNKNOWN.to_string()),
        source_name: source_name.unwrap_or_else(|| UNKNOWN.to_string()),
        citation,
        url,
        note: coerce::text(item.get("note")),
        year,
        title: coerce::text(item.get("title")),
        author: coerce::text(item.get("author")),
    })
}

fn derive_citation(source_name: Option<&str>, year: Option<i32>, url: Option<&str>) -> Option<String> {
    match (source_name.filter(|s| is_known(s)), year, url) {
        (Some(name), Some(year), _) => Some(format!("{name} ({year})")),
        (Some(name), None, _) => Some(name.to_string()),
        (None, _, Some(url)) => Some(url.to_string()),
        (None, _, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use umw_core::enums::ModalityDomain;

    fn hint() -> IdentityHint {
        IdentityHint::named("Great White Shark")
    }

    #[test]
    fn derives_citation_from_name_and_year() {
        assert_eq!(
            derive_citation(Some("Nature"), Some(2019), None),
            Some("Nature (2019)".to_string())
        );
        assert_eq!(
            derive_citation(Some("Unknown"), None, Some("https://example.org")),
            Some("https://example.org".to_string())
        );
        assert_eq!(derive_citation(None, Some(2019), None), None);
    }

    #[test]
    fn scientific_name_falls_back_to_hint() {
        let raw = json!({"identity": {"common_name": "White Pointer"}});
        let record = parse(&raw, &hint()).unwrap();
        assert_eq!(record.identity.common_name, "White Pointer");
        assert_eq!(record.identity.scientific_name, "Great White Shark");
    }

    #[test]
    fn aliases_exclude_primary_names() {
        let raw = json!({"identity": {
            "common_name": "Great White Shark",
            "scientific_name": "Carcharodon carcharias",
            "aliases": ["White Pointer", "Great White Shark"]
        }});
        let record = parse(&raw, &hint()).unwrap();
        assert_eq!(
            record.identity.aliases,
            BTreeSet::from(["White Pointer".to_string()])
        );
    }

    #[test]
    fn missing_sub_type_defaults_to_domain() {
        let raw = json!({"claims": [{"modality_domain": "Touch"}]});
        let record = parse(&raw, &hint()).unwrap();
        assert_eq!(record.claims[0].modality_domain, ModalityDomain::Mechanoreception);
        assert_eq!(record.claims[0].sub_type, "Mechanoreception");
        assert_eq!(record.claims[0].stimulus_type, "Unknown");
    }
}
