//! Shared test utilities for umw-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use serde_json::{Value, json};
    use umw_core::identity::IdentityHint;

    use crate::UmwDb;
    use crate::service::UmwService;
    use crate::trail::writer::TrailWriter;

    /// In-memory service with the trail disabled.
    pub async fn test_service() -> UmwService {
        let db = UmwDb::open_local(":memory:").await.unwrap();
        UmwService::from_db(db, TrailWriter::disabled())
    }

    /// A Great White Shark candidate with one claim in `modality`.
    pub fn shark_candidate(modality: &str) -> (Value, IdentityHint) {
        let raw = json!({
            "identity": {
                "common_name": "Great White Shark",
                "scientific_name": "Carcharodon carcharias",
                "gbif_id": 2_420_694
            },
            "sensory_modalities": [{
                "modality_domain": modality,
                "stimulus_type": "Electric field",
                "evidence": [{
                    "source_type": "Paper",
                    "source_name": "Kalmijn",
                    "year": 1971
                }]
            }],
            "meta": {"data_quality_flag": "High_Evidence"}
        });
        (raw, IdentityHint::named("Great White Shark"))
    }
}
