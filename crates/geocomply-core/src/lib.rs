pub mod config;
pub mod error;
pub mod evidence;
pub mod name;
pub mod record;
pub mod schema;
pub mod text;
pub mod vocabulary;

pub use config::VerificationConfig;
pub use error::ConfigError;
pub use evidence::EvidenceSpan;
pub use name::normalize_regulation_name;
pub use record::{
    Decision, EvidenceQuality, QualityLevel, ReasoningValidation, RegulationMapping,
    VerificationResult,
};
pub use vocabulary::{TermCategory, TermMatch, Vocabulary};
