//! Evidence logging collaborator.
//!
//! The agent hands one [`EvidenceLogRecord`] per verified case to its
//! logger. The default logger does nothing; a missing logger is never an
//! error.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured record of one verification decision.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceLogRecord {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub agent_name: String,
    /// True when the case was auto-approved.
    pub decision_flag: bool,
    pub reasoning_text: String,
    pub feature_id: String,
    pub related_regulations: Vec<String>,
    /// Overall score of the case.
    pub confidence: f64,
    pub retrieval_metadata: serde_json::Value,
    /// Stage name → elapsed milliseconds.
    pub timings_ms: BTreeMap<String, f64>,
}

pub trait EvidenceLogger: Send + Sync {
    fn log(&self, record: &EvidenceLogRecord);
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl EvidenceLogger for NoopLogger {
    fn log(&self, _record: &EvidenceLogRecord) {}
}

/// Emits each record as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl EvidenceLogger for TracingLogger {
    fn log(&self, record: &EvidenceLogRecord) {
        match serde_json::to_string(record) {
            Ok(record_json) => tracing::info!(
                target: "geocomply::evidence",
                request_id = %record.request_id,
                agent = %record.agent_name,
                feature_id = %record.feature_id,
                decision = record.decision_flag,
                confidence = record.confidence,
                record = %record_json,
                "evidence decision logged"
            ),
            Err(e) => {
                tracing::warn!(
                    target: "geocomply::evidence",
                    request_id = %record.request_id,
                    error = %e,
                    "evidence record could not be serialised, logging fields only"
                );
                tracing::info!(
                    target: "geocomply::evidence",
                    request_id = %record.request_id,
                    agent = %record.agent_name,
                    feature_id = %record.feature_id,
                    decision = record.decision_flag,
                    confidence = record.confidence,
                    "evidence decision logged"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(confidence: f64) -> EvidenceLogRecord {
        EvidenceLogRecord {
            request_id: "case-1-0001".into(),
            timestamp: Utc::now(),
            agent_name: "evidence-verification".into(),
            decision_flag: false,
            reasoning_text: "r".into(),
            feature_id: "case-1".into(),
            related_regulations: vec!["GDPR".into()],
            confidence,
            retrieval_metadata: json!({"analyzer": "none"}),
            timings_ms: BTreeMap::from([("total".to_string(), f64::NAN)]),
        }
    }

    #[test]
    fn record_serialises_with_non_finite_numbers() {
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record(f64::INFINITY)).unwrap()).unwrap();
        assert_eq!(value["request_id"], "case-1-0001");
        assert!(value["confidence"].is_null());
        assert!(value["timings_ms"]["total"].is_null());
    }

    #[test]
    fn loggers_accept_any_record() {
        TracingLogger.log(&record(f64::NAN));
        NoopLogger.log(&record(0.5));
    }
}
