//! Optional compliance-analysis collaborator (RAG / LLM backed).
//!
//! The analyzer owns its own transport, timeout, and retry policy. The
//! verification core only consumes its metadata for logging, so analyzer
//! output never changes a score or a decision.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    #[error("analyzer timed out after {0} ms")]
    Timeout(u64),

    #[error("invalid analyzer response: {0}")]
    Invalid(String),
}

/// What the analyzer is asked about.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisContext<'a> {
    pub case_id: &'a str,
    pub regulation_references: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub summary: Option<String>,
    /// Retrieval details (sources, scores, model) passed through to the log.
    pub metadata: Value,
}

pub trait ComplianceAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, context: &AnalysisContext<'_>)
    -> Result<AnalysisOutcome, AnalyzerError>;
}

/// Run the analyzer if one is configured, folding failures into a
/// fallback metadata object.
pub(crate) fn retrieval_metadata(
    analyzer: Option<&dyn ComplianceAnalyzer>,
    text: &str,
    context: &AnalysisContext<'_>,
) -> Value {
    let Some(analyzer) = analyzer else {
        return json!({ "analyzer": "none" });
    };

    match analyzer.analyze(text, context) {
        Ok(outcome) => json!({
            "analyzer": "ok",
            "summary": outcome.summary,
            "metadata": outcome.metadata,
        }),
        Err(e) => {
            tracing::warn!(
                case_id = context.case_id,
                error = %e,
                "compliance analyzer failed, using fallback"
            );
            json!({ "analyzer": "fallback", "fallback": true, "error": e.to_string() })
        }
    }
}
