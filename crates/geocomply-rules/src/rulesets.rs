//! Hardcoded jurisdiction rulesets.
//!
//! Trigger lists name attribute values that count as violations; required
//! controls are violations when absent and their requirement applies;
//! mitigations are safety controls that offset violations.

use crate::jurisdiction::Jurisdiction;

/// When a required control applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The feature admits users younger than this age.
    MinorsUnder(u32),
    /// Any of these addictive features or data practices is present.
    AnyOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredControl {
    pub control: &'static str,
    pub when: Requirement,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Ruleset {
    pub jurisdiction: Jurisdiction,
    pub regulation: &'static str,
    /// Features admitting users younger than this are always a violation.
    pub age_floor: Option<u32>,
    pub addictive_triggers: &'static [&'static str],
    pub data_triggers: &'static [&'static str],
    pub required_controls: &'static [RequiredControl],
    pub mitigations: &'static [&'static str],
}

const USER_CONTENT: &[&str] = &[
    "user_generated_media",
    "private_messaging",
    "file_sharing",
    "live_streaming",
];

const FEEDS: &[&str] = &["personalized_feed", "algorithmic_feed", "behavioral_profiling"];

static US_FLORIDA: Ruleset = Ruleset {
    jurisdiction: Jurisdiction::UsFlorida,
    regulation: "Florida Online Protections for Minors (HB 3)",
    age_floor: Some(14),
    addictive_triggers: &[
        "infinite_scroll",
        "push_notifications",
        "autoplay",
        "streaks",
        "engagement_rewards",
    ],
    data_triggers: &["precise_geolocation", "minor_data_sale"],
    required_controls: &[
        RequiredControl {
            control: "age_verification",
            when: Requirement::MinorsUnder(16),
        },
        RequiredControl {
            control: "parental_consent",
            when: Requirement::MinorsUnder(16),
        },
    ],
    mitigations: &[
        "age_verification",
        "parental_consent",
        "account_deletion",
        "time_limits",
        "notification_controls",
    ],
};

static US_CALIFORNIA: Ruleset = Ruleset {
    jurisdiction: Jurisdiction::UsCalifornia,
    regulation: "California Protecting Our Kids from Social Media Addiction Act (SB 976)",
    age_floor: None,
    addictive_triggers: &[
        "personalized_feed",
        "algorithmic_feed",
        "overnight_notifications",
        "school_hours_notifications",
        "autoplay",
    ],
    data_triggers: &["behavioral_profiling", "targeted_advertising"],
    required_controls: &[
        RequiredControl {
            control: "age_assurance",
            when: Requirement::MinorsUnder(18),
        },
        RequiredControl {
            control: "parental_consent",
            when: Requirement::AnyOf(&["personalized_feed", "algorithmic_feed"]),
        },
    ],
    mitigations: &[
        "chronological_feed_default",
        "parental_consent",
        "age_assurance",
        "quiet_hours",
        "notification_controls",
    ],
};

static EU_DSA: Ruleset = Ruleset {
    jurisdiction: Jurisdiction::Eu,
    regulation: "EU Digital Services Act",
    age_floor: None,
    addictive_triggers: &["dark_patterns", "manipulative_design"],
    data_triggers: &[
        "profiling_minors",
        "targeted_advertising_minors",
        "sensitive_data_advertising",
    ],
    required_controls: &[
        RequiredControl {
            control: "minor_safety_defaults",
            when: Requirement::MinorsUnder(18),
        },
        RequiredControl {
            control: "recommender_opt_out",
            when: Requirement::AnyOf(FEEDS),
        },
    ],
    mitigations: &[
        "risk_assessment",
        "transparency_report",
        "recommender_opt_out",
        "age_assurance",
        "minor_safety_defaults",
    ],
};

static US_FEDERAL: Ruleset = Ruleset {
    jurisdiction: Jurisdiction::UsFederal,
    regulation: "18 U.S.C. § 2258A (CSAM reporting)",
    age_floor: None,
    addictive_triggers: &[],
    data_triggers: &[],
    required_controls: &[
        RequiredControl {
            control: "csam_reporting",
            when: Requirement::AnyOf(USER_CONTENT),
        },
        RequiredControl {
            control: "hash_matching",
            when: Requirement::AnyOf(USER_CONTENT),
        },
    ],
    mitigations: &[
        "csam_reporting",
        "hash_matching",
        "csam_detection",
        "content_moderation",
        "user_reporting",
    ],
};

/// The ruleset for a jurisdiction.
pub fn ruleset(jurisdiction: Jurisdiction) -> &'static Ruleset {
    match jurisdiction {
        Jurisdiction::UsFlorida => &US_FLORIDA,
        Jurisdiction::UsCalifornia => &US_CALIFORNIA,
        Jurisdiction::Eu => &EU_DSA,
        Jurisdiction::UsFederal => &US_FEDERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_jurisdiction_has_a_matching_ruleset() {
        for j in [
            Jurisdiction::UsFlorida,
            Jurisdiction::UsCalifornia,
            Jurisdiction::Eu,
            Jurisdiction::UsFederal,
        ] {
            assert_eq!(ruleset(j).jurisdiction, j);
        }
    }

    #[test]
    fn required_controls_count_as_mitigations() {
        for j in [
            Jurisdiction::UsFlorida,
            Jurisdiction::UsCalifornia,
            Jurisdiction::Eu,
            Jurisdiction::UsFederal,
        ] {
            let rules = ruleset(j);
            for required in rules.required_controls {
                assert!(
                    rules.mitigations.contains(&required.control),
                    "{}: {}",
                    j.code(),
                    required.control
                );
            }
        }
    }
}
