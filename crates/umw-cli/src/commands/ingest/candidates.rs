//! Candidate files: `.json` holding one object or an array of objects, or
//! `.jsonl` with one object per line.
//!
//! Each object is either the candidate itself or an envelope
//! `{"hint": {...}, "candidate": {...}}`, the same shape the trail stores.
//! Fields set in an envelope hint win over the command-line hint.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use umw_core::identity::IdentityHint;
use umw_db::pipeline::Candidate;

pub fn load(path: &Path, hint: &IdentityHint) -> anyhow::Result<Vec<Candidate>> {
    let display = path.display().to_string();
    let is_jsonl = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    let values: Vec<Value> = if is_jsonl {
        serde_jsonlines::json_lines(path)
            .with_context(|| format!("failed to open {display}"))?
            .collect::<Result<Vec<Value>, _>>()
            .with_context(|| format!("failed to parse JSON lines in {display}"))?
    } else {
        let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {display}"))?;
        match serde_json::from_str(&text).with_context(|| format!("failed to parse JSON in {display}"))? {
            Value::Array(items) => items,
            other => vec![other],
        }
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let origin = if is_jsonl {
                format!("{display}:{}", index + 1)
            } else {
                format!("{display}[{index}]")
            };
            let (own_hint, raw) = split_envelope(value, &origin)?;
            Ok(Candidate {
                hint: own_hint.map_or_else(|| hint.clone(), |own| own.or(hint)),
                origin,
                raw,
            })
        })
        .collect()
}

fn split_envelope(value: Value, origin: &str) -> anyhow::Result<(Option<IdentityHint>, Value)> {
    let mut map = match value {
        Value::Object(map)
            if map.contains_key("candidate") && map.keys().all(|k| k == "candidate" || k == "hint") =>
        {
            map
        }
        other => return Ok((None, other)),
    };
    let candidate = map.remove("candidate").unwrap_or(Value::Null);
    let hint = match map.remove("hint") {
        None | Some(Value::Null) => None,
        Some(hint) => Some(
            serde_json::from_value::<IdentityHint>(hint)
                .with_context(|| format!("{origin}: hint is not a valid identity hint"))?,
        ),
    };
    Ok((hint, candidate))
}
