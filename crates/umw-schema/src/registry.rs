//! Central schema registry for all Umwelt types.
//!
//! The `SchemaRegistry` builds JSON Schemas from umw-core types at construction
//! time using [`schemars::schema_for!`] and provides validation via `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, schema_for!($ty).to_value());
    };
}

impl SchemaRegistry {
    /// Build a registry containing all entity, trail, and response schemas.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Entity types (6) ---
        register!(schemas, "species_record", umw_core::entities::SpeciesRecord);
        register!(schemas, "sensory_claim", umw_core::entities::SensoryClaim);
        register!(schemas, "evidence", umw_core::entities::Evidence);
        register!(schemas, "family_profile", umw_core::entities::FamilyProfile);
        register!(schemas, "node", umw_core::entities::Node);
        register!(schemas, "edge", umw_core::entities::Edge);

        // --- Input and trail (3) ---
        register!(schemas, "identity_hint", umw_core::identity::IdentityHint);
        register!(schemas, "trail_operation", umw_core::trail::TrailOperation);
        register!(schemas, "ingest_payload", umw_core::trail::IngestPayload);

        // --- Responses (9) ---
        register!(schemas, "merge_outcome", umw_core::outcome::MergeOutcome);
        register!(
            schemas,
            "ingest_response",
            umw_core::responses::IngestResponse
        );
        register!(schemas, "batch_report", umw_core::responses::BatchReport);
        register!(
            schemas,
            "rebuild_response",
            umw_core::responses::RebuildResponse
        );
        register!(
            schemas,
            "normalize_report",
            umw_core::responses::NormalizeReport
        );
        register!(
            schemas,
            "claim_density_report",
            umw_core::responses::ClaimDensityReport
        );
        register!(schemas, "graph_summary", umw_core::responses::GraphSummary);
        register!(
            schemas,
            "order_modality_matrix",
            umw_core::responses::OrderModalityMatrix
        );
        register!(
            schemas,
            "replay_response",
            umw_core::responses::ReplayResponse
        );

        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// All registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
