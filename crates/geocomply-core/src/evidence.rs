//! Evidence spans cited in support of a compliance judgment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A substring of source text, with provenance, cited as evidence.
///
/// Built once from input and never mutated afterwards. `confidence` is
/// always within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSpan {
    pub text: String,
    pub start_pos: usize,
    pub end_pos: usize,
    pub source: String,
    pub regulation_reference: Option<String>,
    pub confidence: f64,
}

impl EvidenceSpan {
    /// A span covering all of `text`, with full confidence and no regulation link.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        let text = text.into();
        let end_pos = text.chars().count();
        Self {
            text,
            start_pos: 0,
            end_pos,
            source: source.into(),
            regulation_reference: None,
            confidence: 1.0,
        }
    }

    pub fn with_positions(mut self, start_pos: usize, end_pos: usize) -> Self {
        self.start_pos = start_pos;
        self.end_pos = end_pos.max(start_pos);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.regulation_reference = Some(reference.into());
        self
    }

    /// Set the confidence, clamped to `[0, 1]`. NaN becomes 0.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }

    /// Whether the span carries a non-blank regulation reference.
    pub fn is_regulation_linked(&self) -> bool {
        self.regulation_reference
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }

    /// Leniently build a span from a JSON object.
    ///
    /// Missing or wrong-typed fields take their defaults: empty text and
    /// source, positions `0..len(text)`, no reference, confidence 1.0.
    /// Out-of-range confidences are clamped.
    pub fn from_json(value: &Value) -> Self {
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let source = value
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut span = Self::new(text, source);

        let position = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|p| usize::try_from(p).ok())
        };
        match (position("start_pos"), position("end_pos")) {
            (Some(start), Some(end)) => span = span.with_positions(start, end),
            (Some(start), None) => {
                let end = start.saturating_add(span.end_pos);
                span = span.with_positions(start, end);
            }
            (None, Some(end)) => span = span.with_positions(0, end),
            (None, None) => {}
        }

        if let Some(reference) = value.get("regulation_reference").and_then(Value::as_str)
            && !reference.trim().is_empty()
        {
            span = span.with_reference(reference.trim());
        }

        if let Some(confidence) = value.get("confidence").and_then(Value::as_f64) {
            span = span.with_confidence(confidence);
        }

        span
    }
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_defaults_to_full_confidence() {
        let span = EvidenceSpan::new("Operators shall verify age.", "policy.md");
        assert_eq!(span.confidence, 1.0);
        assert_eq!(span.start_pos, 0);
        assert_eq!(span.end_pos, 27);
        assert!(!span.is_regulation_linked());
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(EvidenceSpan::new("x", "s").with_confidence(1.7).confidence, 1.0);
        assert_eq!(EvidenceSpan::new("x", "s").with_confidence(-0.2).confidence, 0.0);
        assert_eq!(EvidenceSpan::new("x", "s").with_confidence(f64::NAN).confidence, 0.0);
    }

    #[test]
    fn from_json_reads_all_fields() {
        let span = EvidenceSpan::from_json(&json!({
            "text": "Personal data shall be processed lawfully.",
            "start_pos": 10,
            "end_pos": 52,
            "source": "gdpr.txt",
            "regulation_reference": " GDPR ",
            "confidence": 0.9
        }));
        assert_eq!(span.start_pos, 10);
        assert_eq!(span.end_pos, 52);
        assert_eq!(span.source, "gdpr.txt");
        assert_eq!(span.regulation_reference.as_deref(), Some("GDPR"));
        assert!((span.confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn from_json_defaults_malformed_fields() {
        let span = EvidenceSpan::from_json(&json!({
            "text": 42,
            "confidence": "high",
            "regulation_reference": "   ",
            "start_pos": -3
        }));
        assert_eq!(span.text, "");
        assert_eq!(span.confidence, 1.0);
        assert!(span.regulation_reference.is_none());
        assert_eq!(span.start_pos, 0);
    }

    #[test]
    fn from_json_huge_start_saturates() {
        for value in [
            json!({"text": "abc", "start_pos": u64::MAX, "end_pos": 5}),
            json!({"text": "abc", "start_pos": u64::MAX}),
        ] {
            let span = EvidenceSpan::from_json(&value);
            assert_eq!(span.text, "abc");
            assert!(span.end_pos >= span.start_pos);
        }
    }

    #[test]
    fn from_json_start_without_end_covers_text() {
        let span = EvidenceSpan::from_json(&json!({"text": "abcd", "start_pos": 6}));
        assert_eq!((span.start_pos, span.end_pos), (6, 10));
    }

    #[test]
    fn end_never_precedes_start() {
        let span = EvidenceSpan::new("abc", "s").with_positions(8, 2);
        assert_eq!(span.end_pos, 8);
    }
}
