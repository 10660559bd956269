//! Regulation mapping validation.
//!
//! A cited regulation is valid only when it resolves to a corpus entry
//! and at least one evidence span shares more than `min_overlap_words`
//! long words with the regulation text.

use std::collections::HashSet;
use std::sync::Arc;

use geocomply_core::text::{excerpt, long_words};
use geocomply_core::{EvidenceSpan, RegulationMapping, VerificationConfig};
use geocomply_corpus::{RegulationCorpus, RegulationEntry, Resolution};
use tracing::debug;

pub struct RegulationMappingValidator {
    corpus: Arc<RegulationCorpus>,
    min_overlap_words: usize,
    min_word_len: usize,
    excerpt_chars: usize,
}

impl RegulationMappingValidator {
    pub fn new(corpus: Arc<RegulationCorpus>, config: &VerificationConfig) -> Self {
        Self {
            corpus,
            min_overlap_words: config.min_overlap_words,
            min_word_len: config.min_word_len,
            excerpt_chars: config.excerpt_chars,
        }
    }

    /// One mapping per reference, in input order.
    pub fn validate(
        &self,
        references: &[String],
        spans: &[EvidenceSpan],
    ) -> Vec<RegulationMapping> {
        let span_words: Vec<HashSet<String>> = spans
            .iter()
            .map(|s| long_words(&s.text, self.min_word_len))
            .collect();

        references
            .iter()
            .map(|reference| self.validate_one(reference, &span_words))
            .collect()
    }

    fn validate_one(&self, reference: &str, span_words: &[HashSet<String>]) -> RegulationMapping {
        let entry = match self.corpus.resolve(reference) {
            Resolution::Exact(entry) | Resolution::Partial(entry) => entry,
            Resolution::Ambiguous => {
                let candidates = self.corpus.candidates(reference).join(", ");
                return invalid(
                    reference,
                    format!("Regulation '{reference}' is ambiguous: matches {candidates}"),
                );
            }
            Resolution::NotFound => {
                return invalid(
                    reference,
                    format!("Regulation '{reference}' not found in database"),
                );
            }
        };

        let regulation_words = long_words(&entry.content, self.min_word_len);
        let best_overlap = span_words
            .iter()
            .map(|words| words.intersection(&regulation_words).count())
            .max()
            .unwrap_or(0);
        let referenced = best_overlap > self.min_overlap_words;
        debug!(reference, key = %entry.key, best_overlap, referenced, "regulation mapping");

        let validation_notes = if referenced {
            format!(
                "Regulation '{}' found and referenced by evidence ({best_overlap} shared terms)",
                entry.key
            )
        } else {
            format!(
                "Regulation '{}' found but not referenced by evidence (best overlap {best_overlap} terms, need more than {})",
                entry.key, self.min_overlap_words
            )
        };

        RegulationMapping {
            regulation_name: entry.key.clone(),
            text_excerpt: excerpt(&entry.content, self.excerpt_chars),
            is_valid: referenced,
            validation_notes,
            section_reference: self.best_section(entry, span_words),
            source_file: Some(entry.path.display().to_string()),
        }
    }

    /// Section sharing the most long words with any span, if any overlap.
    fn best_section(
        &self,
        entry: &RegulationEntry,
        span_words: &[HashSet<String>],
    ) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;
        for (id, text) in &entry.sections {
            let section_words = long_words(text, self.min_word_len);
            let overlap = span_words
                .iter()
                .map(|words| words.intersection(&section_words).count())
                .max()
                .unwrap_or(0);
            if overlap > 0 && best.is_none_or(|(_, n)| overlap > n) {
                best = Some((id.as_str(), overlap));
            }
        }
        best.map(|(id, _)| id.to_string())
    }
}

fn invalid(reference: &str, validation_notes: String) -> RegulationMapping {
    RegulationMapping {
        regulation_name: reference.trim().to_string(),
        text_excerpt: String::new(),
        is_valid: false,
        validation_notes,
        section_reference: None,
        source_file: None,
    }
}
