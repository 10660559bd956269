//! Geography → jurisdiction resolution.

use serde::{Deserialize, Serialize};

/// Jurisdictions with a hardcoded ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "US-FL")]
    UsFlorida,
    #[serde(rename = "US-CA")]
    UsCalifornia,
    #[serde(rename = "EU")]
    Eu,
    /// Federal CSAM reporting, the default for everything else.
    #[serde(rename = "US-2258A")]
    UsFederal,
}

impl Jurisdiction {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UsFlorida => "US-FL",
            Self::UsCalifornia => "US-CA",
            Self::Eu => "EU",
            Self::UsFederal => "US-2258A",
        }
    }
}

const EU_COUNTRIES: &[&str] = &[
    "austria", "belgium", "bulgaria", "croatia", "cyprus", "czechia", "czech republic",
    "denmark", "estonia", "finland", "france", "germany", "greece", "hungary", "ireland",
    "italy", "latvia", "lithuania", "luxembourg", "malta", "netherlands", "poland",
    "portugal", "romania", "slovakia", "slovenia", "spain", "sweden",
];

const USA_NAMES: &[&str] = &["usa", "us", "united states", "united states of america"];

/// Resolve a declared geography to the jurisdiction whose rules apply.
///
/// - USA + Florida/FL → `US-FL`; USA + California/CA → `US-CA`; USA + other → `US-2258A`
/// - an EU member state name, or a country whose first word is `EU` in any
///   case (`"EU"`, `"eu-wide"`) → `EU`; `"Europe"` is not an EU designation
/// - any other non-blank country → `US-2258A`
/// - a blank country → `None` (no geography declared)
pub fn resolve_jurisdiction(country: &str, state: Option<&str>) -> Option<Jurisdiction> {
    let country = country.trim();
    if country.is_empty() {
        return None;
    }
    let lower = country.to_lowercase();

    if USA_NAMES.contains(&lower.as_str()) {
        let state = state.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        return Some(match state.as_str() {
            "florida" | "fl" => Jurisdiction::UsFlorida,
            "california" | "ca" => Jurisdiction::UsCalifornia,
            _ => Jurisdiction::UsFederal,
        });
    }

    if is_eu_designation(&lower) || EU_COUNTRIES.contains(&lower.as_str()) {
        return Some(Jurisdiction::Eu);
    }

    Some(Jurisdiction::UsFederal)
}

fn is_eu_designation(lower: &str) -> bool {
    lower
        .strip_prefix("eu")
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
}
