//! Verification history export: markdown summary and Arrow RecordBatch.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, ListBuilder, StringArray, StringBuilder};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use geocomply_core::VerificationResult;
use geocomply_core::schema::history::verification_history_schema;

/// Markdown table with one row per result, in insertion order.
pub fn markdown_summary(history: &[VerificationResult]) -> String {
    let mut out = String::from(
        "| Case ID | Alignment | Mapping Valid | Evidence Quality | Decision | Notes |\n\
         |---|---|---|---|---|---|\n",
    );
    for r in history {
        out.push_str(&format!(
            "| {} | {:.2} | {} | {:.2} | {} | {} |\n",
            escape_cell(&r.case_id),
            r.reasoning_validation.alignment_score,
            if r.regulation_mapping_valid { "✓" } else { "✗" },
            r.mean_evidence_quality(),
            r.final_decision.as_str(),
            escape_cell(&r.notes),
        ));
    }
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Build a RecordBatch matching [`verification_history_schema`].
pub fn history_to_batch(history: &[VerificationResult]) -> Result<RecordBatch, ArrowError> {
    let mut flags = ListBuilder::new(StringBuilder::new());
    for r in history {
        for flag in &r.flags {
            flags.values().append_value(flag);
        }
        flags.append(true);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(history.iter().map(|r| r.case_id.as_str()))),
        Arc::new(Float64Array::from_iter_values(
            history.iter().map(|r| r.reasoning_validation.alignment_score),
        )),
        Arc::new(BooleanArray::from(
            history
                .iter()
                .map(|r| r.reasoning_validation.is_aligned)
                .collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            history
                .iter()
                .map(|r| r.regulation_mapping_valid)
                .collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from_iter_values(
            history.iter().map(|r| r.mean_evidence_quality()),
        )),
        Arc::new(StringArray::from_iter_values(
            history.iter().map(|r| r.final_decision.as_str()),
        )),
        Arc::new(BooleanArray::from(
            history.iter().map(|r| r.auto_approved).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from_iter_values(history.iter().map(|r| r.overall_score))),
        Arc::new(flags.finish()),
        Arc::new(StringArray::from_iter_values(history.iter().map(|r| r.notes.as_str()))),
    ];

    RecordBatch::try_new(Arc::new(verification_history_schema()), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ListArray};
    use geocomply_core::{Decision, ReasoningValidation};

    fn result(
        case_id: &str,
        decision: Decision,
        flags: &[&str],
        notes: &str,
    ) -> VerificationResult {
        VerificationResult {
            case_id: case_id.into(),
            reasoning_validation: ReasoningValidation {
                reasoning_text: String::new(),
                evidence_spans: Vec::new(),
                alignment_score: 0.5,
                alignment_issues: Vec::new(),
                is_aligned: false,
            },
            evidence_quality: Vec::new(),
            regulation_mappings: Vec::new(),
            regulation_mapping_valid: decision != Decision::ManualReviewRequired,
            auto_approved: decision == Decision::AutoApproved,
            final_decision: decision,
            flags: flags.iter().map(|f| f.to_string()).collect(),
            notes: notes.into(),
            overall_score: 0.6,
        }
    }

    #[test]
    fn markdown_rows_in_insertion_order() {
        let history = vec![
            result("b-2", Decision::ApprovedWithNotes, &[], "fine"),
            result("a-1", Decision::ManualReviewRequired, &["x"], "a | b"),
        ];
        let md = markdown_summary(&history);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "| Case ID | Alignment | Mapping Valid | Evidence Quality | Decision | Notes |"
        );
        assert_eq!(lines[2], "| b-2 | 0.50 | ✓ | 0.00 | Approved with Notes | fine |");
        assert!(!md.contains("-0.00"));
        assert!(lines[3].starts_with("| a-1 |"));
        assert!(lines[3].contains("a \\| b"));
    }

    #[test]
    fn empty_history_has_header_only() {
        assert_eq!(markdown_summary(&[]).lines().count(), 2);
        let batch = history_to_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 10);
    }

    #[test]
    fn batch_carries_flags_and_decisions() {
        let history = vec![
            result("c1", Decision::AutoApproved, &[], "ok"),
            result("c2", Decision::ManualReviewRequired, &["Weak evidence quality", "y"], "no"),
        ];
        let batch = history_to_batch(&history).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let decisions = batch
            .column_by_name("final_decision")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(decisions.value(0), "Auto-Approved");
        assert_eq!(decisions.value(1), "Manual Review Required");

        let flags = batch
            .column_by_name("flags")
            .unwrap()
            .as_any()
            .downcast_ref::<ListArray>()
            .unwrap();
        assert_eq!(flags.value(0).len(), 0);
        assert_eq!(flags.value(1).len(), 2);
    }
}
