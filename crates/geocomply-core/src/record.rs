//! Verification records produced per case.
//!
//! All records are created once during `verify_case` and never mutated.

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceSpan;

/// Strength bucket for a single evidence span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLevel {
    Strong,
    Moderate,
    Weak,
    Generic,
}

impl QualityLevel {
    /// Bucket a quality score: ≥0.8 strong, ≥0.6 moderate, ≥0.4 weak, else generic.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Strong
        } else if score >= 0.6 {
            Self::Moderate
        } else if score >= 0.4 {
            Self::Weak
        } else {
            Self::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::Generic => "Generic",
        }
    }

    /// Weak and generic evidence both raise the weak-evidence flag.
    pub fn is_weak(&self) -> bool {
        matches!(self, Self::Weak | Self::Generic)
    }
}

/// Final verdict for a verified case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "Auto-Approved")]
    AutoApproved,
    #[serde(rename = "Approved with Notes")]
    ApprovedWithNotes,
    #[serde(rename = "Manual Review Required")]
    ManualReviewRequired,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoApproved => "Auto-Approved",
            Self::ApprovedWithNotes => "Approved with Notes",
            Self::ManualReviewRequired => "Manual Review Required",
        }
    }
}

/// Association between a cited regulation name and its corpus text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationMapping {
    pub regulation_name: String,
    pub text_excerpt: String,
    pub is_valid: bool,
    /// Always non-empty when `is_valid` is false.
    pub validation_notes: String,
    pub section_reference: Option<String>,
    pub source_file: Option<String>,
}

/// Alignment of reasoning text with its evidence spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningValidation {
    pub reasoning_text: String,
    pub evidence_spans: Vec<EvidenceSpan>,
    /// Mean per-span similarity, in `[0, 1]`.
    pub alignment_score: f64,
    pub alignment_issues: Vec<String>,
    pub is_aligned: bool,
}

/// Quality assessment for a single evidence span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceQuality {
    pub span: EvidenceSpan,
    pub quality_score: f64,
    pub quality_level: QualityLevel,
    pub specific_language: bool,
    pub regulation_linked: bool,
    pub compliance_terms: Vec<String>,
    pub quality_notes: String,
}

/// Outcome of one `verify_case` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_id: String,
    pub reasoning_validation: ReasoningValidation,
    pub evidence_quality: Vec<EvidenceQuality>,
    pub regulation_mappings: Vec<RegulationMapping>,
    pub regulation_mapping_valid: bool,
    pub final_decision: Decision,
    pub auto_approved: bool,
    pub flags: Vec<String>,
    pub notes: String,
    pub overall_score: f64,
}

impl VerificationResult {
    /// Mean evidence quality score, 0 when there is no evidence.
    pub fn mean_evidence_quality(&self) -> f64 {
        if self.evidence_quality.is_empty() {
            return 0.0;
        }
        let total = self
            .evidence_quality
            .iter()
            .fold(0.0, |acc, q| acc + q.quality_score);
        total / self.evidence_quality.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_buckets() {
        assert_eq!(QualityLevel::from_score(0.9), QualityLevel::Strong);
        assert_eq!(QualityLevel::from_score(0.8), QualityLevel::Strong);
        assert_eq!(QualityLevel::from_score(0.79), QualityLevel::Moderate);
        assert_eq!(QualityLevel::from_score(0.6), QualityLevel::Moderate);
        assert_eq!(QualityLevel::from_score(0.4), QualityLevel::Weak);
        assert_eq!(QualityLevel::from_score(0.39), QualityLevel::Generic);
        assert_eq!(QualityLevel::from_score(0.0), QualityLevel::Generic);
    }

    #[test]
    fn weak_levels() {
        assert!(QualityLevel::Weak.is_weak());
        assert!(QualityLevel::Generic.is_weak());
        assert!(!QualityLevel::Moderate.is_weak());
    }

    #[test]
    fn mean_quality_without_evidence_is_positive_zero() {
        let result = VerificationResult {
            case_id: "c".into(),
            reasoning_validation: ReasoningValidation {
                reasoning_text: String::new(),
                evidence_spans: Vec::new(),
                alignment_score: 0.0,
                alignment_issues: Vec::new(),
                is_aligned: false,
            },
            evidence_quality: Vec::new(),
            regulation_mappings: Vec::new(),
            regulation_mapping_valid: false,
            final_decision: Decision::ManualReviewRequired,
            auto_approved: false,
            flags: Vec::new(),
            notes: String::new(),
            overall_score: 0.0,
        };
        let mean = result.mean_evidence_quality();
        assert_eq!(mean, 0.0);
        assert!(mean.is_sign_positive());
        assert_eq!(format!("{mean:.2}"), "0.00");
    }

    #[test]
    fn decision_serializes_display_name() {
        let json = serde_json::to_string(&Decision::ApprovedWithNotes).unwrap();
        assert_eq!(json, "\"Approved with Notes\"");
        let back: Decision = serde_json::from_str("\"Auto-Approved\"").unwrap();
        assert_eq!(back, Decision::AutoApproved);
    }
}
