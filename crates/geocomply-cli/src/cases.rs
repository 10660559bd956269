//! JSON input files for the `verify` and `evaluate` commands.

use std::path::Path;

use anyhow::{Context, bail};
use geocomply_core::EvidenceSpan;
use serde_json::Value;

/// One case to verify, read leniently from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationCase {
    pub case_id: String,
    pub reasoning_text: String,
    pub evidence_spans: Vec<EvidenceSpan>,
    pub regulation_references: Vec<String>,
}

impl VerificationCase {
    /// Missing fields default to empty; a missing `case_id` becomes `case-<n>`
    /// with `n` the 1-based position in the file.
    pub fn from_json(value: &Value, position: usize) -> Self {
        let case_id = value
            .get("case_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("case-{position}"));
        let reasoning_text = value
            .get("reasoning_text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let evidence_spans = value
            .get("evidence_spans")
            .and_then(Value::as_array)
            .map(|spans| spans.iter().map(EvidenceSpan::from_json).collect())
            .unwrap_or_default();
        let regulation_references = match value.get("regulation_references") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        };

        Self {
            case_id,
            reasoning_text,
            evidence_spans,
            regulation_references,
        }
    }
}

/// Read a JSON array of records, or an object holding one under `key`.
fn read_records(path: &Path, key: &str) -> anyhow::Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("{}: expected an array under \"{key}\"", path.display()),
        },
        _ => bail!("{}: expected a JSON array", path.display()),
    }
}

pub fn load_cases(path: &Path) -> anyhow::Result<Vec<VerificationCase>> {
    let records = read_records(path, "cases")?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(i, record)| VerificationCase::from_json(record, i + 1))
        .collect())
}

/// Feature records paired with their id (`feature_id`, else `feature-<n>`).
pub fn load_features(path: &Path) -> anyhow::Result<Vec<(String, Value)>> {
    let records = read_records(path, "features")?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let id = record
                .get("feature_id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("feature-{}", i + 1));
            (id, record)
        })
        .collect())
}
