use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use umw_core::entities::{FamilyProfile, FrequencyRange, ModalityPrevalence};
use umw_core::enums::{Confidence, Presence};
use umw_core::identity::IdentityHint;
use umw_core::ids::{collapse_whitespace, is_known};

use super::{Scope, bounds, coerce, stable_id, synonyms};
use crate::error::SchemaViolation;

const MODALITY_KEYS: &[&str] = &["sensory_modalities", "modalities"];
const FREQUENCY_KEYS: &[&str] = &["frequency_range", "frequency_range_hz"];

pub fn parse(raw: &Value, hint: &IdentityHint) -> Result<FamilyProfile, SchemaViolation> {
    let scope = Scope::new(raw, hint, &[&["family_name"]]);
    scope.require_object(raw, "$")?;

    let family_name = coerce::text(raw.get("family_name"))
        .or_else(|| hint.display_name().map(str::to_string))
        .map(|n| collapse_whitespace(&n))
        .ok_or_else(|| scope.violation("family_name", "required"))?;

    let stable_id = stable_id(
        &scope,
        hint,
        &[
            ("stable_id", raw.get("stable_id")),
            ("gbif_id", raw.get("gbif_id")),
        ],
    )?;

    let order_name = coerce::text(raw.get("order_name"))
        .filter(|o| is_known(o))
        .or_else(|| hint.order_name.clone().filter(|o| is_known(o)))
        .map(|o| collapse_whitespace(&o));

    let mut modalities = match coerce::first(raw, MODALITY_KEYS) {
        None => BTreeMap::new(),
        Some((key, Value::Object(entries))) => {
            let mut modalities = BTreeMap::new();
            for (name, entry) in entries {
                let path = format!("{key}.{name}");
                if name.trim().is_empty() {
                    return Err(scope.violation(path, "modality name must not be empty"));
                }
                modalities.insert(name.clone(), parse_prevalence(&scope, entry, &path)?);
            }
            modalities
        }
        Some((key, _)) => return Err(scope.violation(key, "must be an object")),
    };

    // A pass that names no species per modality was inferred from the
    // representatives the caller researched.
    let representatives: BTreeSet<String> = hint
        .representative_species
        .iter()
        .map(|s| collapse_whitespace(s))
        .filter(|s| !s.is_empty())
        .collect();
    for prevalence in modalities.values_mut() {
        if prevalence.inferred_from_species.is_empty() {
            prevalence.inferred_from_species.clone_from(&representatives);
        }
    }

    let sources = coerce::text_list(raw.get("sources"))
        .map_err(|c| scope.violation("sources", c))?
        .into_iter()
        .collect();

    let confidence = match coerce::text(raw.get("confidence")) {
        None => Confidence::default(),
        Some(label) => synonyms::confidence(&label).ok_or_else(|| {
            scope.violation("confidence", format!("unknown confidence {label:?}"))
        })?,
    };

    let generated_at = match coerce::text(raw.get("generated_at")) {
        None => Utc::now(),
        Some(ts) => parse_timestamp(&ts)
            .ok_or_else(|| scope.violation("generated_at", "must be an RFC 3339 timestamp"))?,
    };

    Ok(FamilyProfile {
        family_name,
        stable_id,
        order_name,
        modalities,
        sources,
        confidence,
        generated_at,
    })
}

fn parse_prevalence(
    scope: &Scope,
    entry: &Value,
    path: &str,
) -> Result<ModalityPrevalence, SchemaViolation> {
    scope.require_object(entry, path)?;

    let presence = match coerce::text(entry.get("presence")) {
        None => Presence::default(),
        Some(label) => synonyms::presence(&label).ok_or_else(|| {
            scope.violation(
                format!("{path}.presence"),
                format!("unknown presence {label:?}"),
            )
        })?,
    };

    let inferred_from_species = coerce::text_list(entry.get("inferred_from_species"))
        .map_err(|c| scope.violation(format!("{path}.inferred_from_species"), c))?
        .into_iter()
        .map(|s| collapse_whitespace(&s))
        .collect();

    let frequency_range = match coerce::first(entry, FREQUENCY_KEYS) {
        None => None,
        Some((key, block)) => {
            let range_path = format!("{path}.{key}");
            scope.require_object(block, &range_path)?;
            let (min, max) = bounds(scope, block, &range_path)?;
            (min.is_some() || max.is_some()).then_some(FrequencyRange { min, max })
        }
    };

    Ok(ModalityPrevalence {
        presence,
        notes: coerce::text(entry.get("notes")).unwrap_or_default(),
        inferred_from_species,
        frequency_range,
    })
}

/// RFC 3339, or a naive ISO 8601 timestamp taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
