//! Jurisdiction rule engine for synthetic compliance label generation.
//!
//! Independent of the verification pipeline: a feature's attributes and
//! declared geography go in, a label with rationale comes out.

mod attributes;
mod engine;
mod jurisdiction;
mod rulesets;

pub use attributes::FeatureAttributes;
pub use engine::{ComplianceEvaluation, ComplianceLabel, ComplianceRuleEngine, RuleEngineConfig};
pub use jurisdiction::{Jurisdiction, resolve_jurisdiction};
pub use rulesets::{Requirement, RequiredControl, Ruleset, ruleset};
