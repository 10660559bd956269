//! Evidence quality scoring.
//!
//! A span's strength combines compliance-term density (shared
//! [`Vocabulary`], evidential categories only), specificity of its
//! language, and whether it cites a regulation:
//!
//! ```text
//! score = min(1, 0.4·min(1, terms/4) + 0.3·specific + 0.2·linked) × confidence
//! ```

use std::sync::Arc;

use geocomply_core::text::word_count;
use geocomply_core::{EvidenceQuality, EvidenceSpan, QualityLevel, Vocabulary};
use regex::Regex;

const TERM_WEIGHT: f64 = 0.4;
const TERM_SATURATION: f64 = 4.0;
const SPECIFIC_WEIGHT: f64 = 0.3;
const LINKED_WEIGHT: f64 = 0.2;
/// Specific language tolerates at most this many hedging terms.
const MAX_GENERIC_TERMS: usize = 1;
const SHORT_WORDS: usize = 10;
const LONG_WORDS: usize = 100;

pub struct EvidenceQualityScorer {
    vocabulary: Arc<Vocabulary>,
    specific_indicators: Vec<Regex>,
    generic_terms: Regex,
}

impl EvidenceQualityScorer {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        let specific_indicators = [
            // Years.
            r"\b(?:19|20)\d{2}\b",
            // Section, article, and paragraph-sign numbers: "Article 8", "§ 2258A", "s.2(1)".
            r"(?i)(?:\b(?:section|article|art\.|s\.)|§)\s*\d+[a-z]?(?:\.\d+)*(?:\([a-z0-9]+\))*",
            // Two-word capitalised proper nouns: "Digital Services", "Federal Trade".
            r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b",
            // Modal legal terms.
            r"(?i)\b(?:shall|must|required|prohibited)\b",
        ]
        .into_iter()
        .map(|p| Regex::new(p).expect("specificity pattern is valid"))
        .collect();

        let generic_terms = Regex::new(
            r"(?i)\b(?:general|generally|may|might|could|appropriate|reasonable|possibly|typically|various|some|certain)\b",
        )
        .expect("generic term pattern is valid");

        Self {
            vocabulary,
            specific_indicators,
            generic_terms,
        }
    }

    /// Assess one span. Empty text scores 0 and is rated weak.
    pub fn score(&self, span: &EvidenceSpan) -> EvidenceQuality {
        let regulation_linked = span.is_regulation_linked();

        if span.text.trim().is_empty() {
            return EvidenceQuality {
                span: span.clone(),
                quality_score: 0.0,
                quality_level: QualityLevel::Weak,
                specific_language: false,
                regulation_linked,
                compliance_terms: Vec::new(),
                quality_notes: "Empty evidence span".to_string(),
            };
        }

        let compliance_terms: Vec<String> = self
            .vocabulary
            .find_evidential(&span.text)
            .into_iter()
            .map(|m| m.term)
            .collect();
        let specific_language = self.is_specific(&span.text);

        let term_part = TERM_WEIGHT * (compliance_terms.len() as f64 / TERM_SATURATION).min(1.0);
        let specific_part = if specific_language { SPECIFIC_WEIGHT } else { 0.0 };
        let linked_part = if regulation_linked { LINKED_WEIGHT } else { 0.0 };
        let quality_score =
            ((term_part + specific_part + linked_part).min(1.0) * span.confidence).clamp(0.0, 1.0);

        let quality_notes = notes(&compliance_terms, specific_language, word_count(&span.text));

        EvidenceQuality {
            span: span.clone(),
            quality_score,
            quality_level: QualityLevel::from_score(quality_score),
            specific_language,
            regulation_linked,
            compliance_terms,
            quality_notes,
        }
    }

    /// Specific iff fewer than two hedging terms and at least one specific indicator.
    pub fn is_specific(&self, text: &str) -> bool {
        let generic = self.generic_terms.find_iter(text).count();
        generic <= MAX_GENERIC_TERMS && self.specific_indicators.iter().any(|p| p.is_match(text))
    }
}

fn notes(terms: &[String], specific: bool, words: usize) -> String {
    let mut parts = Vec::with_capacity(3);

    if terms.is_empty() {
        parts.push("No compliance terms found".to_string());
    } else {
        let sample: Vec<&str> = terms.iter().take(3).map(String::as_str).collect();
        parts.push(format!(
            "Found {} compliance term(s): {}",
            terms.len(),
            sample.join(", ")
        ));
    }

    parts.push(if specific {
        "Uses specific regulatory language".to_string()
    } else {
        "Language is generic".to_string()
    });

    if words < SHORT_WORDS {
        parts.push(format!("Evidence is short ({words} words)"));
    } else if words > LONG_WORDS {
        parts.push(format!("Evidence is long ({words} words)"));
    }

    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> EvidenceQualityScorer {
        EvidenceQualityScorer::new(Arc::new(Vocabulary::standard()))
    }

    #[test]
    fn empty_span_is_weak_zero() {
        for text in ["", "   \n"] {
            let q = scorer().score(&EvidenceSpan::new(text, "doc").with_reference("GDPR"));
            assert_eq!(q.quality_score, 0.0);
            assert_eq!(q.quality_level, QualityLevel::Weak);
            assert_eq!(q.quality_notes, "Empty evidence span");
        }
    }

    #[test]
    fn strong_specific_linked_span() {
        let span = EvidenceSpan::new(
            "Under Article 8 the controller shall obtain parental consent and must ensure compliance, subject to penalty.",
            "gdpr.txt",
        )
        .with_reference("GDPR");
        let q = scorer().score(&span);
        // shall, must, ensure, compliance, article, penalty: saturates term weight.
        assert!(q.compliance_terms.len() >= 4);
        assert!(q.specific_language);
        assert!(q.regulation_linked);
        assert!((q.quality_score - 0.9).abs() < 1e-12);
        assert_eq!(q.quality_level, QualityLevel::Strong);
    }

    #[test]
    fn confidence_scales_score() {
        let span = EvidenceSpan::new(
            "Under Article 8 the controller shall obtain parental consent and must ensure compliance, subject to penalty.",
            "gdpr.txt",
        )
        .with_reference("GDPR")
        .with_confidence(0.5);
        let q = scorer().score(&span);
        assert!((q.quality_score - 0.45).abs() < 1e-12);
        assert_eq!(q.quality_level, QualityLevel::Weak);
    }

    #[test]
    fn hedging_language_is_generic() {
        let span = EvidenceSpan::new(
            "Teams may generally take appropriate steps where some risk might arise.",
            "wiki",
        );
        let q = scorer().score(&span);
        assert!(!q.specific_language);
        assert!(q.compliance_terms.is_empty());
        assert_eq!(q.quality_score, 0.0);
        assert_eq!(q.quality_level, QualityLevel::Generic);
        assert!(q.quality_notes.contains("Language is generic"));
    }

    #[test]
    fn one_hedge_still_specific() {
        assert!(scorer().is_specific("Providers may be fined under Section 5."));
        assert!(!scorer().is_specific("Providers may possibly be fined under Section 5."));
        assert!(!scorer().is_specific("nothing specific here"));
    }

    #[test]
    fn specific_indicators() {
        let s = scorer();
        assert!(s.is_specific("enacted in 2023"));
        assert!(s.is_specific("see § 2258A"));
        assert!(s.is_specific("the Federal Trade commission"));
        assert!(s.is_specific("access is prohibited"));
    }

    #[test]
    fn notes_report_terms_and_length() {
        let q = scorer().score(&EvidenceSpan::new("Operators must comply.", "doc"));
        assert_eq!(
            q.quality_notes,
            "Found 2 compliance term(s): comply, must; Uses specific regulatory language; Evidence is short (3 words)"
        );
    }

    #[test]
    fn long_evidence_is_noted() {
        let text = "word ".repeat(120);
        let q = scorer().score(&EvidenceSpan::new(text, "doc"));
        assert!(q.quality_notes.ends_with("Evidence is long (120 words)"));
    }

    #[test]
    fn score_always_within_unit_interval() {
        let texts = [
            "shall must required mandatory prohibited banned penalty fine audit breach Article 5 in 2020",
            "x",
            "Section 1",
        ];
        for text in texts {
            let q = scorer().score(&EvidenceSpan::new(text, "doc").with_reference("R"));
            assert!((0.0..=1.0).contains(&q.quality_score));
            assert_eq!(q.quality_level, QualityLevel::from_score(q.quality_score));
        }
    }
}
