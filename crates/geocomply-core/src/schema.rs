/// Arrow schema for exported verification history.
pub mod history {
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    /// One row per `VerificationResult`, in insertion order.
    pub fn verification_history_schema() -> Schema {
        Schema::new(vec![
            Field::new("case_id", DataType::Utf8, false),
            Field::new("alignment_score", DataType::Float64, false),
            Field::new("is_aligned", DataType::Boolean, false),
            Field::new("regulation_mapping_valid", DataType::Boolean, false),
            Field::new("evidence_quality", DataType::Float64, false),
            Field::new("final_decision", DataType::Utf8, false),
            Field::new("auto_approved", DataType::Boolean, false),
            Field::new("overall_score", DataType::Float64, false),
            Field::new(
                "flags",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                false,
            ),
            Field::new("notes", DataType::Utf8, true),
        ])
    }
}
