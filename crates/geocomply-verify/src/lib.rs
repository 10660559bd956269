//! Evidence verification: alignment, regulation mapping, evidence quality,
//! and the final decision, driven by [`VerificationAgent`].

mod agent;
mod alignment;
mod analyzer;
mod decision;
mod logger;
mod mapping;
mod quality;
pub mod report;

pub use agent::{AGENT_NAME, AgentStats, VerificationAgent};
pub use alignment::{TextAligner, sequence_ratio, token_jaccard};
pub use analyzer::{AnalysisContext, AnalysisOutcome, AnalyzerError, ComplianceAnalyzer};
pub use decision::{
    FLAG_INVALID_MAPPINGS, FLAG_MISALIGNED, FLAG_WEAK_EVIDENCE, VerificationDecisionEngine,
};
pub use logger::{EvidenceLogRecord, EvidenceLogger, NoopLogger, TracingLogger};
pub use mapping::RegulationMappingValidator;
pub use quality::EvidenceQualityScorer;
pub use report::{history_to_batch, markdown_summary};
