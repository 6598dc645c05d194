//! Lenient readers for untyped candidate fields.
//!
//! Each reader returns `Ok(None)` for absent or null values and
//! `Err(constraint)` when a value is present but unusable. The caller attaches
//! the field path.

use serde_json::Value;
use umw_core::ids::MAX_STABLE_ID;

pub const STABLE_ID_RANGE: &str = "must be a non-negative integer <= 9223372036854775807";

/// Strings are trimmed and emptied strings are treated as absent. Numbers and
/// booleans are stringified. Arrays and objects are not text.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A finite number, accepting numeric strings such as `"12.5"`.
pub fn number(value: Option<&Value>) -> Result<Option<f64>, &'static str> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err("must be a finite number"),
    }
}

/// A non-negative integer no larger than [`MAX_STABLE_ID`], accepting
/// integer strings.
pub fn stable_id(value: Option<&Value>) -> Result<Option<u64>, &'static str> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|id| *id <= MAX_STABLE_ID)
        .map(Some)
        .ok_or(STABLE_ID_RANGE)
}

pub fn year(value: Option<&Value>) -> Result<Option<i32>, &'static str> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        Some(_) => None,
    };
    parsed.map(Some).ok_or("must be an integer year")
}

/// An array of text values. A single string is accepted as a one-item list.
pub fn text_list(value: Option<&Value>) -> Result<Vec<String>, &'static str> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(|v| text(Some(v))).collect()),
        Some(v @ Value::String(_)) => Ok(text(Some(v)).into_iter().collect()),
        Some(_) => Err("must be an array of strings"),
    }
}

/// The first present, non-null value among `keys`.
pub fn first<'a>(object: &'a Value, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_stringifies_scalars() {
        assert_eq!(text(Some(&json!("  Lamnidae "))), Some("Lamnidae".into()));
        assert_eq!(text(Some(&json!(42))), Some("42".into()));
        assert_eq!(text(Some(&json!(true))), Some("true".into()));
        assert_eq!(text(Some(&json!("   "))), None);
        assert_eq!(text(Some(&json!(null))), None);
        assert_eq!(text(Some(&json!(["a"]))), None);
        assert_eq!(text(None), None);
    }

    #[test]
    fn number_accepts_numeric_strings() {
        assert_eq!(number(Some(&json!("12.5"))), Ok(Some(12.5)));
        assert_eq!(number(Some(&json!(3))), Ok(Some(3.0)));
        assert_eq!(number(Some(&json!(null))), Ok(None));
        assert_eq!(number(Some(&json!(""))), Ok(None));
        assert!(number(Some(&json!("high"))).is_err());
        assert!(number(Some(&json!("NaN"))).is_err());
        assert!(number(Some(&json!({"v": 1}))).is_err());
    }

    #[test]
    fn stable_id_rejects_negative_and_fractional() {
        assert_eq!(stable_id(Some(&json!(2_420_694))), Ok(Some(2_420_694)));
        assert_eq!(stable_id(Some(&json!("2420694"))), Ok(Some(2_420_694)));
        assert!(stable_id(Some(&json!(-1))).is_err());
        assert!(stable_id(Some(&json!(1.5))).is_err());
        assert!(stable_id(Some(&json!("abc"))).is_err());
    }

    #[test]
    fn stable_id_must_fit_the_store() {
        assert_eq!(
            stable_id(Some(&json!(9_223_372_036_854_775_807_u64))),
            Ok(Some(MAX_STABLE_ID))
        );
        assert_eq!(
            stable_id(Some(&json!("9223372036854775808"))),
            Err(STABLE_ID_RANGE)
        );
        assert_eq!(
            stable_id(Some(&json!(18_446_744_073_709_551_615_u64))),
            Err(STABLE_ID_RANGE)
        );
    }

    #[test]
    fn text_list_accepts_single_string() {
        assert_eq!(text_list(Some(&json!("a"))), Ok(vec!["a".to_string()]));
        assert_eq!(
            text_list(Some(&json!(["a", " ", 3]))),
            Ok(vec!["a".to_string(), "3".to_string()])
        );
        assert!(text_list(Some(&json!({"a": 1}))).is_err());
    }

    #[test]
    fn first_skips_nulls() {
        let object = json!({"claims": null, "sensory_modalities": []});
        let (key, _) = first(&object, &["claims", "sensory_modalities"]).unwrap();
        assert_eq!(key, "sensory_modalities");
    }
}
