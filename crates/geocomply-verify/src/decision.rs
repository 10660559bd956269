//! Final verdict for a verified case.
//!
//! Combines reasoning alignment, regulation mapping validity, and evidence
//! quality into one overall score, a flag list, and a decision. Never
//! fails: every input combination yields a result, and ambiguity lands in
//! "Manual Review Required".

use geocomply_core::{
    Decision, EvidenceQuality, ReasoningValidation, RegulationMapping, VerificationConfig,
    VerificationResult,
};

pub const FLAG_MISALIGNED: &str = "Reasoning-evidence misalignment";
pub const FLAG_INVALID_MAPPINGS: &str = "Invalid regulation mappings";
pub const FLAG_WEAK_EVIDENCE: &str = "Weak evidence quality";

#[derive(Debug, Clone)]
pub struct VerificationDecisionEngine {
    auto_approval_threshold: f64,
    quality_threshold: f64,
}

impl VerificationDecisionEngine {
    pub fn new(config: &VerificationConfig) -> Self {
        Self {
            auto_approval_threshold: config.auto_approval_threshold,
            quality_threshold: config.quality_threshold,
        }
    }

    pub fn decide(
        &self,
        case_id: &str,
        reasoning_validation: ReasoningValidation,
        evidence_quality: Vec<EvidenceQuality>,
        regulation_mappings: Vec<RegulationMapping>,
    ) -> VerificationResult {
        let mut flags = Vec::new();
        let mut notes = Vec::new();

        if !reasoning_validation.is_aligned {
            flags.push(FLAG_MISALIGNED.to_string());
            notes.push(format!(
                "Reasoning alignment {:.2} is below the required level",
                reasoning_validation.alignment_score
            ));
        }

        let total_mappings = regulation_mappings.len();
        let valid_mappings = regulation_mappings.iter().filter(|m| m.is_valid).count();
        let invalid_mappings = total_mappings - valid_mappings;
        if invalid_mappings > 0 {
            flags.push(FLAG_INVALID_MAPPINGS.to_string());
            notes.push(format!(
                "{invalid_mappings} of {total_mappings} regulation mapping(s) invalid"
            ));
        }
        if total_mappings == 0 {
            notes.push("No regulation references cited".to_string());
        }

        let weak_spans = evidence_quality
            .iter()
            .filter(|q| q.quality_level.is_weak())
            .count();
        if weak_spans > 0 {
            flags.push(FLAG_WEAK_EVIDENCE.to_string());
            notes.push(format!("{weak_spans} evidence span(s) rated weak or generic"));
        }

        let regulation_validity_ratio = valid_mappings as f64 / total_mappings.max(1) as f64;
        let mean_quality = evidence_quality
            .iter()
            .fold(0.0, |acc, q| acc + q.quality_score)
            / evidence_quality.len().max(1) as f64;
        let overall_score = ((reasoning_validation.alignment_score
            + regulation_validity_ratio
            + mean_quality)
            / 3.0)
            .clamp(0.0, 1.0);

        let final_decision = if overall_score >= self.auto_approval_threshold && flags.is_empty() {
            notes.push(format!(
                "All checks passed with overall score {overall_score:.2}"
            ));
            Decision::AutoApproved
        } else if overall_score >= self.quality_threshold {
            notes.push(format!(
                "Overall score {overall_score:.2} meets the quality threshold {:.2}; approved with notes",
                self.quality_threshold
            ));
            Decision::ApprovedWithNotes
        } else {
            notes.push(format!(
                "Overall score {overall_score:.2} is below the quality threshold {:.2}; manual review required",
                self.quality_threshold
            ));
            Decision::ManualReviewRequired
        };

        VerificationResult {
            case_id: case_id.to_string(),
            reasoning_validation,
            evidence_quality,
            regulation_mapping_valid: total_mappings > 0 && invalid_mappings == 0,
            regulation_mappings,
            auto_approved: final_decision == Decision::AutoApproved,
            final_decision,
            flags,
            notes: notes.join("; "),
            overall_score,
        }
    }
}
