//! Verification thresholds and tunables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds used by the verification pipeline.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Mean span alignment at or above which reasoning counts as aligned.
    pub alignment_threshold: f64,
    /// Overall score needed (with no flags) for auto-approval.
    pub auto_approval_threshold: f64,
    /// Overall score needed for approval with notes.
    pub quality_threshold: f64,
    /// A span references a regulation when it shares more than this many
    /// long words with the regulation text.
    pub min_overlap_words: usize,
    /// Minimum length of a word counted for overlap.
    pub min_word_len: usize,
    /// Characters of regulation text kept in a mapping excerpt.
    pub excerpt_chars: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            alignment_threshold: 0.75,
            auto_approval_threshold: 0.85,
            quality_threshold: 0.70,
            min_overlap_words: 3,
            min_word_len: 4,
            excerpt_chars: 200,
        }
    }
}

impl VerificationConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check thresholds are within `[0, 1]` and correctly ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("alignment_threshold", self.alignment_threshold),
            ("auto_approval_threshold", self.auto_approval_threshold),
            ("quality_threshold", self.quality_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.quality_threshold > self.auto_approval_threshold {
            return Err(ConfigError::Invalid(format!(
                "quality_threshold ({}) exceeds auto_approval_threshold ({})",
                self.quality_threshold, self.auto_approval_threshold
            )));
        }
        if self.min_word_len == 0 {
            return Err(ConfigError::Invalid("min_word_len must be at least 1".into()));
        }
        Ok(())
    }
}
