//! Regulation corpus: plain-text regulation files keyed by filename stem.

mod corpus;
mod error;
mod sections;

pub use corpus::{RegulationCorpus, RegulationEntry, Resolution};
pub use error::CorpusError;
pub use sections::SectionExtractor;
