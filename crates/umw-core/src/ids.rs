//! Profile key and graph node identifier derivation.
//!
//! Profile keys look like `sp-gbif-2420694` when a stable identifier is known
//! and `sp-name-great white shark` otherwise. Graph node identifiers are
//! `"{kind}:{canonical_name}"`.

use crate::enums::{EntityKind, NodeKind};
use crate::errors::CoreError;

pub const PREFIX_SPECIES: &str = "sp";
pub const PREFIX_FAMILY: &str = "fam";

const BASIS_STABLE_ID: &str = "gbif";
const BASIS_NAME: &str = "name";

/// Placeholder stored for unknown taxonomy ranks.
pub const UNKNOWN: &str = "Unknown";

/// Largest stable identifier the store can hold (an SQLite INTEGER).
pub const MAX_STABLE_ID: u64 = i64::MAX.unsigned_abs();

/// `false` for empty strings and the `"Unknown"` placeholder.
#[must_use]
pub fn is_known(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(UNKNOWN)
}

/// Trim and collapse runs of whitespace to a single space.
#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cased, whitespace-collapsed form used for name keys.
#[must_use]
pub fn fold_name(value: &str) -> String {
    collapse_whitespace(value).to_lowercase()
}

#[must_use]
pub const fn prefix_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Species => PREFIX_SPECIES,
        EntityKind::Family => PREFIX_FAMILY,
    }
}

/// Derive the storage key for an entity. A stable identifier always wins
/// over the name.
#[must_use]
pub fn profile_key(kind: EntityKind, stable_id: Option<u64>, name: &str) -> String {
    let prefix = prefix_for(kind);
    match stable_id {
        Some(id) => format!("{prefix}-{BASIS_STABLE_ID}-{id}"),
        None => format!("{prefix}-{BASIS_NAME}-{}", fold_name(name)),
    }
}

/// Name key with a numeric suffix for records that could not be matched
/// unambiguously to one existing profile.
#[must_use]
pub fn disambiguated_key(kind: EntityKind, name: &str, n: u32) -> String {
    format!("{}-{n}", profile_key(kind, None, name))
}

/// What a profile key was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyBasis {
    StableId(u64),
    Name(String),
}

/// Split a profile key back into its entity kind and basis.
///
/// # Errors
///
/// Returns [`CoreError::InvalidKey`] when the prefix or basis is not recognised
/// or a stable-id key does not end in an integer.
pub fn parse_profile_key(key: &str) -> Result<(EntityKind, KeyBasis), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let (prefix, rest) = key.split_once('-').ok_or_else(|| invalid("missing prefix"))?;
    let kind = match prefix {
        PREFIX_SPECIES => EntityKind::Species,
        PREFIX_FAMILY => EntityKind::Family,
        _ => return Err(invalid("unknown prefix")),
    };

    let (basis, value) = rest.split_once('-').ok_or_else(|| invalid("missing basis"))?;
    let basis = match basis {
        BASIS_STABLE_ID => KeyBasis::StableId(
            value
                .parse::<u64>()
                .map_err(|_| invalid("stable id is not an integer"))?,
        ),
        BASIS_NAME if !value.is_empty() => KeyBasis::Name(value.to_string()),
        BASIS_NAME => return Err(invalid("empty name")),
        _ => return Err(invalid("unknown basis")),
    };

    Ok((kind, basis))
}

/// Deterministic graph node identifier.
#[must_use]
pub fn node_id(kind: NodeKind, canonical_name: &str) -> String {
    format!("{}:{}", kind.as_str(), collapse_whitespace(canonical_name))
}

/// Kind prefix of a node identifier, if it has one.
#[must_use]
pub fn node_kind_of(id: &str) -> Option<NodeKind> {
    let (prefix, _) = id.split_once(':')?;
    match prefix {
        "species" => Some(NodeKind::Species),
        "family" => Some(NodeKind::Family),
        "order" => Some(NodeKind::Order),
        "modality" => Some(NodeKind::Modality),
        "sub_type" => Some(NodeKind::SubType),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn stable_id_wins_over_name() {
        assert_eq!(
            profile_key(EntityKind::Species, Some(2_420_694), "Great White Shark"),
            "sp-gbif-2420694"
        );
        assert_eq!(
            profile_key(EntityKind::Family, Some(8), "Lamnidae"),
            "fam-gbif-8"
        );
    }

    #[test]
    fn name_key_is_folded() {
        assert_eq!(
            profile_key(EntityKind::Species, None, "  Great   White\tShark "),
            "sp-name-great white shark"
        );
        assert_eq!(
            disambiguated_key(EntityKind::Family, "Lamnidae", 2),
            "fam-name-lamnidae-2"
        );
    }

    #[rstest]
    #[case("sp-gbif-42", EntityKind::Species, KeyBasis::StableId(42))]
    #[case("fam-gbif-7", EntityKind::Family, KeyBasis::StableId(7))]
    #[case(
        "sp-name-great white shark",
        EntityKind::Species,
        KeyBasis::Name("great white shark".to_string())
    )]
    #[case(
        "fam-name-lamnidae-2",
        EntityKind::Family,
        KeyBasis::Name("lamnidae-2".to_string())
    )]
    fn parse_valid_keys(#[case] key: &str, #[case] kind: EntityKind, #[case] basis: KeyBasis) {
        assert_eq!(parse_profile_key(key).unwrap(), (kind, basis));
    }

    #[rstest]
    #[case("")]
    #[case("xx-gbif-1")]
    #[case("sp-gbif-abc")]
    #[case("sp-name-")]
    #[case("sp-other-1")]
    #[case("sp")]
    fn parse_invalid_keys(#[case] key: &str) {
        assert!(matches!(
            parse_profile_key(key),
            Err(CoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn node_ids_are_kind_prefixed() {
        assert_eq!(
            node_id(NodeKind::Modality, "Photoreception"),
            "modality:Photoreception"
        );
        assert_eq!(
            node_id(NodeKind::Species, " Carcharodon   carcharias "),
            "species:Carcharodon carcharias"
        );
        assert_eq!(node_kind_of("sub_type:Ampullae"), Some(NodeKind::SubType));
        assert_eq!(node_kind_of("plain"), None);
    }

    #[test]
    fn unknown_placeholder_is_not_known() {
        assert!(!is_known("Unknown"));
        assert!(!is_known(" unknown "));
        assert!(!is_known(""));
        assert!(is_known("Lamniformes"));
    }
}
