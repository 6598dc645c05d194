//! Candidate record validation and repair.
//!
//! This is the only stage allowed to correct malformed input. Repairs made
//! here: missing names filled from the identity hint, taxonomy coerced to
//! strings with `"Unknown"` defaults, synonym labels remapped to their
//! enumeration values, numeric strings coerced, empty quantitative blocks
//! dropped, and missing citations derived from the source name or URL.
//! Everything else that does not fit the typed record is a
//! [`SchemaViolation`].

mod coerce;
mod family;
mod species;
pub mod synonyms;

use serde_json::Value;
use umw_core::entities::{FamilyProfile, SpeciesRecord};
use umw_core::identity::IdentityHint;
use umw_core::ids::MAX_STABLE_ID;

use crate::error::SchemaViolation;

/// Entry point for turning untyped candidates into typed records.
pub struct Validator;

impl Validator {
    /// # Errors
    ///
    /// Returns a [`SchemaViolation`] naming the entity, the offending field
    /// path and the constraint when the candidate cannot be repaired.
    pub fn parse_species(raw: &Value, hint: &IdentityHint) -> Result<SpeciesRecord, SchemaViolation> {
        species::parse(raw, hint)
    }

    /// # Errors
    ///
    /// Returns a [`SchemaViolation`] as for [`Self::parse_species`].
    pub fn parse_family(raw: &Value, hint: &IdentityHint) -> Result<FamilyProfile, SchemaViolation> {
        family::parse(raw, hint)
    }
}

/// Builds violations for one entity.
struct Scope {
    entity: String,
}

impl Scope {
    fn new(raw: &Value, hint: &IdentityHint, name_paths: &[&[&str]]) -> Self {
        let from_record = name_paths.iter().find_map(|path| {
            let mut cursor = raw;
            for key in *path {
                cursor = cursor.get(*key)?;
            }
            coerce::text(Some(cursor))
        });
        let entity = hint
            .display_name()
            .map(str::to_string)
            .or(from_record)
            .unwrap_or_else(|| "<unnamed>".to_string());
        Self { entity }
    }

    fn violation(&self, field: impl Into<String>, constraint: impl Into<String>) -> SchemaViolation {
        SchemaViolation {
            entity: self.entity.clone(),
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    fn require_object<'a>(&self, value: &'a Value, field: &str) -> Result<&'a Value, SchemaViolation> {
        if value.is_object() {
            Ok(value)
        } else {
            Err(self.violation(field, "must be an object"))
        }
    }

    fn number(&self, object: &Value, parent: &str, key: &str) -> Result<Option<f64>, SchemaViolation> {
        coerce::number(object.get(key)).map_err(|c| self.violation(format!("{parent}.{key}"), c))
    }
}

/// Read a `{min, max}` pair, enforcing `min <= max` when both are present.
fn bounds(
    scope: &Scope,
    object: &Value,
    path: &str,
) -> Result<(Option<f64>, Option<f64>), SchemaViolation> {
    let min = scope.number(object, path, "min")?;
    let max = scope.number(object, path, "max")?;
    if let (Some(lo), Some(hi)) = (min, max) {
        if hi < lo {
            return Err(scope.violation(
                format!("{path}.max"),
                format!("must be >= min ({hi} < {lo})"),
            ));
        }
    }
    Ok((min, max))
}

fn stable_id(
    scope: &Scope,
    hint: &IdentityHint,
    candidates: &[(&str, Option<&Value>)],
) -> Result<Option<u64>, SchemaViolation> {
    if let Some(id) = hint.stable_id {
        if id > MAX_STABLE_ID {
            return Err(scope.violation("stable_id", coerce::STABLE_ID_RANGE));
        }
        return Ok(Some(id));
    }
    for (path, value) in candidates {
        if let Some(id) = coerce::stable_id(*value).map_err(|c| scope.violation(*path, c))? {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
