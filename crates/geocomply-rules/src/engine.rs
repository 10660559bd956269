//! Rule evaluation and labeling.

use std::path::Path;

use geocomply_core::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::attributes::{DEFAULT_AGE_MIN, FeatureAttributes};
use crate::jurisdiction::resolve_jurisdiction;
use crate::rulesets::{Requirement, Ruleset, ruleset};

const MAX_LISTED_VIOLATIONS: usize = 3;
const MAX_LISTED_MITIGATIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceLabel {
    #[serde(rename = "Compliant")]
    Compliant,
    #[serde(rename = "Partially Compliant")]
    PartiallyCompliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

impl ComplianceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::PartiallyCompliant => "Partially Compliant",
            Self::NonCompliant => "Non-Compliant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleEngineConfig {
    /// Violations are only partially compliant when
    /// `mitigations ≥ violations × partial_mitigation_ratio`.
    pub partial_mitigation_ratio: f64,
    /// Age assumed when a feature does not declare one.
    pub default_age_min: u32,
}

impl Default for RuleEngineConfig {
    fn default() -> Self {
        Self {
            partial_mitigation_ratio: 0.5,
            default_age_min: DEFAULT_AGE_MIN,
        }
    }
}

impl RuleEngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.partial_mitigation_ratio.is_finite() || self.partial_mitigation_ratio < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "partial_mitigation_ratio must be a non-negative number, got {}",
                self.partial_mitigation_ratio
            )));
        }
        Ok(())
    }
}

/// Label, rationale, and implicated jurisdiction codes for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceEvaluation {
    pub label: ComplianceLabel,
    pub rationale: String,
    pub implicated_regulations: Vec<String>,
    pub violations: Vec<String>,
    pub mitigations: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceRuleEngine {
    config: RuleEngineConfig,
}

impl ComplianceRuleEngine {
    pub fn new(config: RuleEngineConfig) -> Self {
        Self { config }
    }

    /// Label a feature for its declared geography. Never fails.
    pub fn evaluate_compliance(
        &self,
        attrs: &FeatureAttributes,
        geo_country: &str,
        geo_state: Option<&str>,
    ) -> ComplianceEvaluation {
        let Some(jurisdiction) = resolve_jurisdiction(geo_country, geo_state) else {
            return ComplianceEvaluation {
                label: ComplianceLabel::Compliant,
                rationale: "No specific regulations apply".to_string(),
                implicated_regulations: Vec::new(),
                violations: Vec::new(),
                mitigations: Vec::new(),
            };
        };

        let rules = ruleset(jurisdiction);
        let violations = violations(rules, attrs);
        let mitigations: Vec<String> = rules
            .mitigations
            .iter()
            .filter(|m| attrs.safety_controls.contains(**m))
            .map(|m| m.to_string())
            .collect();

        let (label, rationale) = self.label(rules, &violations, &mitigations);
        debug!(
            jurisdiction = jurisdiction.code(),
            violations = violations.len(),
            mitigations = mitigations.len(),
            label = label.as_str(),
            "feature evaluated"
        );

        ComplianceEvaluation {
            label,
            rationale,
            implicated_regulations: vec![jurisdiction.code().to_string()],
            violations,
            mitigations,
        }
    }

    /// Evaluate a JSON feature record carrying attributes plus `geo_country`
    /// and optional `geo_state`. Malformed fields take their defaults.
    pub fn evaluate_json(&self, record: &Value) -> ComplianceEvaluation {
        let attrs = FeatureAttributes::from_json(record, self.config.default_age_min);
        let country = record
            .get("geo_country")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let state = record.get("geo_state").and_then(Value::as_str);
        self.evaluate_compliance(&attrs, country, state)
    }

    fn label(
        &self,
        rules: &Ruleset,
        violations: &[String],
        mitigations: &[String],
    ) -> (ComplianceLabel, String) {
        if violations.is_empty() {
            let mut rationale = format!("No violations of {} detected", rules.regulation);
            if !mitigations.is_empty() {
                rationale.push_str(&format!(" ({} safeguard(s) in place)", mitigations.len()));
            }
            return (ComplianceLabel::Compliant, rationale);
        }

        let covered = mitigations.len() as f64
            >= violations.len() as f64 * self.config.partial_mitigation_ratio;
        if covered && !mitigations.is_empty() {
            let named: Vec<&str> = mitigations
                .iter()
                .take(MAX_LISTED_MITIGATIONS)
                .map(String::as_str)
                .collect();
            return (
                ComplianceLabel::PartiallyCompliant,
                format!(
                    "{} violation(s) of {} offset by {} mitigation(s): {}",
                    violations.len(),
                    rules.regulation,
                    mitigations.len(),
                    named.join(", ")
                ),
            );
        }

        let named: Vec<&str> = violations
            .iter()
            .take(MAX_LISTED_VIOLATIONS)
            .map(String::as_str)
            .collect();
        let mut rationale = format!(
            "Non-compliant with {}: {}",
            rules.regulation,
            named.join("; ")
        );
        if violations.len() > MAX_LISTED_VIOLATIONS {
            rationale.push_str(&format!(
                " and {} others",
                violations.len() - MAX_LISTED_VIOLATIONS
            ));
        }
        (ComplianceLabel::NonCompliant, rationale)
    }
}

/// Violations in ruleset order: age floor, addictive features, data
/// practices, then missing required controls.
fn violations(rules: &Ruleset, attrs: &FeatureAttributes) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(floor) = rules.age_floor.filter(|floor| attrs.age_min < *floor) {
        out.push(format!("Targets users under {floor}"));
    }

    for feature in rules.addictive_triggers {
        if attrs.addictive_features.contains(*feature) {
            out.push(format!("Addictive feature '{feature}' is restricted"));
        }
    }

    for practice in rules.data_triggers {
        if attrs.data_practices.contains(*practice) {
            out.push(format!("Data practice '{practice}' is restricted"));
        }
    }

    for required in rules.required_controls {
        let applies = match required.when {
            Requirement::MinorsUnder(age) => attrs.age_min < age,
            Requirement::AnyOf(triggers) => triggers.iter().any(|t| {
                attrs.addictive_features.contains(*t) || attrs.data_practices.contains(*t)
            }),
        };
        if applies && !attrs.safety_controls.contains(required.control) {
            out.push(format!("Missing required control '{}'", required.control));
        }
    }

    out
}
