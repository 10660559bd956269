//! Terminal rendering for verification history, rule evaluations, and the
//! loaded corpus.

use arrow::util::pretty::pretty_format_batches;
use clap::ValueEnum;
use geocomply_core::VerificationResult;
use geocomply_corpus::RegulationCorpus;
use geocomply_rules::ComplianceEvaluation;
use geocomply_verify::{AgentStats, history_to_batch, markdown_summary};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
    Table,
}

#[derive(Serialize)]
struct HistoryReport<'a> {
    results: &'a [VerificationResult],
    stats: &'a AgentStats,
}

/// Render the verification history in the requested format.
pub fn render_history(
    history: &[VerificationResult],
    stats: &AgentStats,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Markdown => {
            let mut out = markdown_summary(history);
            out.push('\n');
            out.push_str(&stats_line(stats));
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&HistoryReport {
            results: history,
            stats,
        })?),
        OutputFormat::Table => {
            let batch = history_to_batch(history)?;
            let mut out = pretty_format_batches(&[batch])?.to_string();
            out.push('\n');
            out.push_str(&stats_line(stats));
            Ok(out)
        }
    }
}

fn stats_line(stats: &AgentStats) -> String {
    format!(
        "{} case(s): {} auto-approved, {} approved with notes, {} manual review (auto-approval rate {:.0}%, mean score {:.3})",
        stats.total,
        stats.auto_approved,
        stats.approved_with_notes,
        stats.manual_review,
        stats.auto_approval_rate * 100.0,
        stats.mean_overall_score,
    )
}

#[derive(Serialize)]
struct EvaluationLine<'a> {
    feature_id: &'a str,
    #[serde(flatten)]
    evaluation: &'a ComplianceEvaluation,
}

/// One JSON object per line.
pub fn evaluation_line(
    feature_id: &str,
    evaluation: &ComplianceEvaluation,
) -> anyhow::Result<String> {
    Ok(serde_json::to_string(&EvaluationLine {
        feature_id,
        evaluation,
    })?)
}

/// List regulations with their section and term counts.
pub fn render_corpus(corpus: &RegulationCorpus) -> String {
    if corpus.is_empty() {
        return "No regulations loaded.".to_string();
    }
    let mut out = format!(
        "{:<32} {:>8} {:>8} {:>10}\n",
        "regulation", "sections", "terms", "chars"
    );
    for entry in corpus.entries() {
        out.push_str(&format!(
            "{:<32} {:>8} {:>8} {:>10}\n",
            entry.key,
            entry.sections.len(),
            entry.compliance_terms.len(),
            entry.content.chars().count(),
        ));
    }
    out.push_str(&format!("\n{} regulation(s)", corpus.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocomply_core::Vocabulary;
    use geocomply_rules::{ComplianceRuleEngine, FeatureAttributes};

    fn stats() -> AgentStats {
        AgentStats {
            total: 0,
            auto_approved: 0,
            approved_with_notes: 0,
            manual_review: 0,
            auto_approval_rate: 0.0,
            mean_overall_score: 0.0,
        }
    }

    #[test]
    fn markdown_history_ends_with_stats() {
        let out = render_history(&[], &stats(), OutputFormat::Markdown).unwrap();
        assert!(out.starts_with("| Case ID |"));
        assert!(out.ends_with("mean score 0.000)"));
    }

    #[test]
    fn json_history_is_parseable() {
        let out = render_history(&[], &stats(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["results"], serde_json::json!([]));
        assert_eq!(value["stats"]["total"], 0);
    }

    #[test]
    fn evaluation_line_flattens_label() {
        let eval = ComplianceRuleEngine::default().evaluate_compliance(
            &FeatureAttributes::default(),
            "",
            None,
        );
        let line = evaluation_line("f-1", &eval).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["feature_id"], "f-1");
        assert_eq!(value["label"], "Compliant");
        assert_eq!(value["rationale"], "No specific regulations apply");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn corpus_listing() {
        let vocab = Vocabulary::standard();
        assert_eq!(render_corpus(&RegulationCorpus::empty()), "No regulations loaded.");

        let corpus = RegulationCorpus::from_texts(
            [("GDPR", "Section 1. Personal data shall be processed with consent.")],
            &vocab,
        );
        let out = render_corpus(&corpus);
        assert!(out.lines().nth(1).unwrap().starts_with("GDPR"));
        assert!(out.ends_with("1 regulation(s)"));
    }
}
