//! Evidence verification agent.
//!
//! Runs the full pipeline for one case: alignment → regulation mapping →
//! evidence quality → decision. Each result is appended to an in-memory
//! history that lives as long as the agent and is never rewritten.
//! `verify_case` takes `&mut self`; share an agent across threads behind
//! a `Mutex`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use geocomply_core::{Decision, EvidenceSpan, VerificationConfig, VerificationResult, Vocabulary};
use geocomply_corpus::RegulationCorpus;
use serde::Serialize;
use tracing::{debug, info};

use crate::alignment::TextAligner;
use crate::analyzer::{AnalysisContext, ComplianceAnalyzer, retrieval_metadata};
use crate::decision::VerificationDecisionEngine;
use crate::logger::{EvidenceLogRecord, EvidenceLogger, NoopLogger};
use crate::mapping::RegulationMappingValidator;
use crate::quality::EvidenceQualityScorer;

pub const AGENT_NAME: &str = "evidence-verification";

pub struct VerificationAgent {
    aligner: TextAligner,
    scorer: EvidenceQualityScorer,
    validator: RegulationMappingValidator,
    engine: VerificationDecisionEngine,
    logger: Box<dyn EvidenceLogger>,
    analyzer: Option<Box<dyn ComplianceAnalyzer>>,
    history: Vec<VerificationResult>,
}

/// Aggregate counts over the verification history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStats {
    pub total: usize,
    pub auto_approved: usize,
    pub approved_with_notes: usize,
    pub manual_review: usize,
    pub auto_approval_rate: f64,
    pub mean_overall_score: f64,
}

impl VerificationAgent {
    pub fn new(
        corpus: Arc<RegulationCorpus>,
        vocabulary: Arc<Vocabulary>,
        config: &VerificationConfig,
    ) -> Self {
        Self {
            aligner: TextAligner::new(config.alignment_threshold),
            scorer: EvidenceQualityScorer::new(vocabulary),
            validator: RegulationMappingValidator::new(corpus, config),
            engine: VerificationDecisionEngine::new(config),
            logger: Box::new(NoopLogger),
            analyzer: None,
            history: Vec::new(),
        }
    }

    pub fn with_logger(mut self, logger: impl EvidenceLogger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl ComplianceAnalyzer + 'static) -> Self {
        self.analyzer = Some(Box::new(analyzer));
        self
    }

    /// Verify one case and record the result in the history.
    ///
    /// Scoring is deterministic: repeated calls with the same inputs give
    /// the same assessments and overall score.
    pub fn verify_case(
        &mut self,
        case_id: &str,
        reasoning_text: &str,
        evidence_spans: &[EvidenceSpan],
        regulation_references: &[String],
    ) -> VerificationResult {
        let started = Instant::now();
        let mut timings_ms = BTreeMap::new();

        let stage = Instant::now();
        let reasoning_validation = self.aligner.validate(reasoning_text, evidence_spans);
        timings_ms.insert("alignment".to_string(), elapsed_ms(stage));
        debug!(
            case_id,
            alignment = reasoning_validation.alignment_score,
            issues = reasoning_validation.alignment_issues.len(),
            "reasoning validated"
        );

        let stage = Instant::now();
        let mappings = self.validator.validate(regulation_references, evidence_spans);
        timings_ms.insert("regulation_mapping".to_string(), elapsed_ms(stage));
        debug!(
            case_id,
            valid = mappings.iter().filter(|m| m.is_valid).count(),
            total = mappings.len(),
            "regulation mappings validated"
        );

        let stage = Instant::now();
        let evidence_quality: Vec<_> =
            evidence_spans.iter().map(|s| self.scorer.score(s)).collect();
        timings_ms.insert("evidence_quality".to_string(), elapsed_ms(stage));

        let stage = Instant::now();
        let result = self
            .engine
            .decide(case_id, reasoning_validation, evidence_quality, mappings);
        timings_ms.insert("decision".to_string(), elapsed_ms(stage));

        let context = AnalysisContext {
            case_id,
            regulation_references,
        };
        let metadata = retrieval_metadata(self.analyzer.as_deref(), reasoning_text, &context);
        timings_ms.insert("total".to_string(), elapsed_ms(started));

        info!(
            case_id,
            decision = result.final_decision.as_str(),
            overall_score = result.overall_score,
            flags = result.flags.len(),
            "case verified"
        );

        self.logger.log(&EvidenceLogRecord {
            request_id: format!("{case_id}-{:04}", self.history.len() + 1),
            timestamp: Utc::now(),
            agent_name: AGENT_NAME.to_string(),
            decision_flag: result.auto_approved,
            reasoning_text: reasoning_text.to_string(),
            feature_id: case_id.to_string(),
            related_regulations: regulation_references.to_vec(),
            confidence: result.overall_score,
            retrieval_metadata: metadata,
            timings_ms,
        });

        self.history.push(result.clone());
        result
    }

    /// Every result so far, in insertion order.
    pub fn history(&self) -> &[VerificationResult] {
        &self.history
    }

    pub fn stats(&self) -> AgentStats {
        let count = |d: Decision| self.history.iter().filter(|r| r.final_decision == d).count();
        let total = self.history.len();
        let auto_approved = count(Decision::AutoApproved);
        let denom = total.max(1) as f64;

        AgentStats {
            total,
            auto_approved,
            approved_with_notes: count(Decision::ApprovedWithNotes),
            manual_review: count(Decision::ManualReviewRequired),
            auto_approval_rate: auto_approved as f64 / denom,
            mean_overall_score: self
                .history
                .iter()
                .fold(0.0, |acc, r| acc + r.overall_score)
                / denom,
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisOutcome, AnalyzerError};
    use geocomply_core::QualityLevel;
    use std::sync::Mutex;

    const GDPR: &str = "Section 5 Principles. The controller shall ensure data protection by \
        consent and minimization as required by Article 5. Personal data shall be adequate, \
        relevant and limited to what is necessary. Section 6 Penalty. Infringements are \
        subject to administrative fines.";

    const EVIDENCE: &str = "The controller shall ensure data protection by consent and \
        minimization as required by Article 5 compliance obligations.";

    const REASONING: &str = "complies with data protection by consent and minimization";

    #[derive(Clone, Default)]
    struct MemoryLogger(Arc<Mutex<Vec<EvidenceLogRecord>>>);

    impl EvidenceLogger for MemoryLogger {
        fn log(&self, record: &EvidenceLogRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    struct FailingAnalyzer;

    impl ComplianceAnalyzer for FailingAnalyzer {
        fn analyze(
            &self,
            _text: &str,
            _context: &AnalysisContext<'_>,
        ) -> Result<AnalysisOutcome, AnalyzerError> {
            Err(AnalyzerError::Unavailable("offline".into()))
        }
    }

    fn agent_with_gdpr() -> VerificationAgent {
        let vocab = Arc::new(Vocabulary::standard());
        let corpus = RegulationCorpus::from_texts([("GDPR", GDPR)], &vocab);
        VerificationAgent::new(Arc::new(corpus), vocab, &VerificationConfig::default())
    }

    fn gdpr_span() -> EvidenceSpan {
        EvidenceSpan::new(EVIDENCE, "GDPR.txt")
            .with_reference("GDPR")
            .with_confidence(0.95)
    }

    fn refs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matching_gdpr_evidence_is_approved() {
        let mut agent = agent_with_gdpr();
        let result = agent.verify_case("case-gdpr", REASONING, &[gdpr_span()], &refs(&["GDPR"]));

        assert!(result.regulation_mapping_valid, "{:?}", result.regulation_mappings);
        assert!(
            matches!(
                result.final_decision,
                Decision::AutoApproved | Decision::ApprovedWithNotes
            ),
            "{:?}: {}",
            result.final_decision,
            result.notes
        );
        assert_eq!(result.evidence_quality[0].quality_level, QualityLevel::Strong);
        assert_eq!(
            result.regulation_mappings[0].section_reference.as_deref(),
            Some("Section 5")
        );
    }

    #[test]
    fn no_evidence_requires_manual_review() {
        let mut agent = agent_with_gdpr();
        let result = agent.verify_case("case-empty", REASONING, &[], &refs(&["GDPR"]));

        assert_eq!(result.reasoning_validation.alignment_score, 0.0);
        assert!(!result.reasoning_validation.is_aligned);
        assert_eq!(result.final_decision, Decision::ManualReviewRequired);
        assert!(!result.auto_approved);
    }

    #[test]
    fn empty_span_scores_zero_and_is_flagged() {
        let mut agent = agent_with_gdpr();
        let result = agent.verify_case(
            "case-blank",
            REASONING,
            &[EvidenceSpan::new("", "doc")],
            &refs(&["GDPR"]),
        );
        let q = &result.evidence_quality[0];
        assert_eq!(q.quality_score, 0.0);
        assert_eq!(q.quality_level, QualityLevel::Weak);
        assert!(
            result
                .reasoning_validation
                .alignment_issues
                .iter()
                .any(|i| i.starts_with("Empty evidence span"))
        );
        assert_eq!(result.final_decision, Decision::ManualReviewRequired);
    }

    #[test]
    fn verification_is_deterministic() {
        let mut agent = agent_with_gdpr();
        let spans = [gdpr_span(), EvidenceSpan::new("Users may opt out.", "faq")];
        let a = agent.verify_case("same", REASONING, &spans, &refs(&["GDPR", "COPPA"]));
        let b = agent.verify_case("same", REASONING, &spans, &refs(&["GDPR", "COPPA"]));

        assert_eq!(a.reasoning_validation, b.reasoning_validation);
        assert_eq!(a.evidence_quality, b.evidence_quality);
        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(agent.history().len(), 2);
    }

    #[test]
    fn reference_matching_ignores_case() {
        let mut agent = agent_with_gdpr();
        let result = agent.verify_case("case-lower", REASONING, &[gdpr_span()], &refs(&["gdpr"]));
        assert!(result.regulation_mappings[0].is_valid);
        assert_eq!(result.regulation_mappings[0].regulation_name, "GDPR");
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let mut agent = agent_with_gdpr();
        let spans = [
            gdpr_span(),
            EvidenceSpan::new("", "x"),
            EvidenceSpan::new("general guidance", "x").with_confidence(3.0),
        ];
        let r = agent.verify_case("bounds", "", &spans, &refs(&["", "GDPR", "nothing"]));
        assert!((0.0..=1.0).contains(&r.reasoning_validation.alignment_score));
        assert!((0.0..=1.0).contains(&r.overall_score));
        for q in &r.evidence_quality {
            assert!((0.0..=1.0).contains(&q.quality_score));
        }
    }

    #[test]
    fn logger_receives_one_record_per_case() {
        let logger = MemoryLogger::default();
        let mut agent = agent_with_gdpr()
            .with_logger(logger.clone())
            .with_analyzer(FailingAnalyzer);

        agent.verify_case("case-a", REASONING, &[gdpr_span()], &refs(&["GDPR"]));
        agent.verify_case("case-b", REASONING, &[], &[]);

        let records = logger.0.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].request_id, "case-a-0001");
        assert_eq!(records[1].request_id, "case-b-0002");
        assert_eq!(records[0].agent_name, AGENT_NAME);
        assert_eq!(records[0].related_regulations, vec!["GDPR".to_string()]);
        assert_eq!(records[0].retrieval_metadata["fallback"], true);
        assert!(records[0].timings_ms.contains_key("total"));
        assert!(!records[1].decision_flag);
    }

    #[test]
    fn stats_summarise_history() {
        let mut agent = agent_with_gdpr();
        assert_eq!(agent.stats().total, 0);
        assert_eq!(agent.stats().mean_overall_score, 0.0);
        assert!(agent.stats().mean_overall_score.is_sign_positive());

        agent.verify_case("a", REASONING, &[gdpr_span()], &refs(&["GDPR"]));
        agent.verify_case("b", REASONING, &[], &[]);

        let stats = agent.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.manual_review, 1);
        assert_eq!(
            stats.auto_approved + stats.approved_with_notes + stats.manual_review,
            2
        );
    }
}
