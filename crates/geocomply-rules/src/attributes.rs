//! Feature attributes consumed by the rule engine.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_AGE_MIN: u32 = 18;

/// Attribute bundle of a synthetic feature.
///
/// Attribute names are normalised (lowercase, spaces and hyphens become
/// underscores) so "Infinite Scroll" and "infinite_scroll" are the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureAttributes {
    pub addictive_features: BTreeSet<String>,
    pub data_practices: BTreeSet<String>,
    pub safety_controls: BTreeSet<String>,
    pub age_min: u32,
}

impl Default for FeatureAttributes {
    fn default() -> Self {
        Self {
            addictive_features: BTreeSet::new(),
            data_practices: BTreeSet::new(),
            safety_controls: BTreeSet::new(),
            age_min: DEFAULT_AGE_MIN,
        }
    }
}

impl FeatureAttributes {
    pub fn new(
        addictive_features: &[&str],
        data_practices: &[&str],
        safety_controls: &[&str],
        age_min: u32,
    ) -> Self {
        Self {
            addictive_features: normalize_all(addictive_features.iter().copied()),
            data_practices: normalize_all(data_practices.iter().copied()),
            safety_controls: normalize_all(safety_controls.iter().copied()),
            age_min,
        }
    }

    /// Leniently read attributes from a JSON object.
    ///
    /// Never fails. Missing or wrong-typed collections are empty, non-string
    /// items are dropped, and a missing or invalid `age_min` becomes
    /// `default_age_min`. Negative ages clamp to 0.
    pub fn from_json(value: &Value, default_age_min: u32) -> Self {
        let set = |key: &str| -> BTreeSet<String> {
            match value.get(key) {
                Some(Value::Array(items)) => normalize_all(items.iter().filter_map(Value::as_str)),
                Some(Value::String(s)) => normalize_all(s.split(',')),
                _ => BTreeSet::new(),
            }
        };

        let age_min = match value.get("age_min") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .map(|a| a.clamp(0, u32::MAX as i64) as u32)
                .unwrap_or(default_age_min),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default_age_min),
            _ => default_age_min,
        };

        Self {
            addictive_features: set("addictive_features"),
            data_practices: set("data_practices"),
            safety_controls: set("safety_controls"),
            age_min,
        }
    }
}

pub(crate) fn normalize_attribute(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn normalize_all<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| normalize_attribute(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}
