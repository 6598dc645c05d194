use serde::de::DeserializeOwned;
use umw_core::enums::{ModalityDomain, Relationship};
use umw_db::service::UmwService;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Relationship names are stored upper-case; accept `has-sense` and friends.
pub fn parse_relationship(raw: &str) -> anyhow::Result<Relationship> {
    parse_enum(&raw.to_ascii_uppercase(), "relationship")
}

/// A canonical modality name or any synonym the service vocabulary knows.
pub fn parse_modality(raw: &str, service: &UmwService) -> anyhow::Result<ModalityDomain> {
    service
        .normalizer()
        .vocabulary()
        .lookup(raw)
        .ok_or_else(|| anyhow::anyhow!("invalid modality '{raw}': not a known modality or synonym"))
}
