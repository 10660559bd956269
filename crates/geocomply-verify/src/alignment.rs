//! Lexical alignment between reasoning text and evidence.
//!
//! The score is an approximate lexical-overlap heuristic, **not** semantic
//! similarity: two paraphrases with no shared wording score near zero, and
//! two unrelated sentences built from the same words can score high.
//! Downstream alignment decisions inherit that precision.
//!
//! Score = mean of
//! - the character matching-blocks ratio (Ratcliff/Obershelp, as in classic
//!   diff tools: `2·M / (|a| + |b|)` where `M` is the total size of the
//!   recursively found longest common blocks), and
//! - the Jaccard overlap of whitespace-split tokens,
//!
//! both computed on lowercased, whitespace-collapsed text, capped at 1.0.

use std::collections::HashSet;

use geocomply_core::text::normalize_text;
use geocomply_core::{EvidenceSpan, ReasoningValidation};
use tracing::debug;

/// Scores reasoning/evidence alignment and validates a case's reasoning.
#[derive(Debug, Clone)]
pub struct TextAligner {
    alignment_threshold: f64,
}

impl TextAligner {
    pub fn new(alignment_threshold: f64) -> Self {
        Self {
            alignment_threshold,
        }
    }

    /// Similarity of two texts in `[0, 1]`. Empty input scores 0.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = normalize_text(a);
        let b = normalize_text(b);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let ratio = sequence_ratio(&a, &b);
        let jaccard = token_jaccard(&a, &b);
        ((ratio + jaccard) / 2.0).min(1.0)
    }

    /// Score every span against the reasoning and collect alignment issues.
    ///
    /// The alignment score is the mean span similarity (0 with no spans).
    pub fn validate(&self, reasoning_text: &str, spans: &[EvidenceSpan]) -> ReasoningValidation {
        let mut issues = Vec::new();

        if reasoning_text.trim().is_empty() {
            issues.push("Empty reasoning text".to_string());
        }
        if spans.is_empty() {
            issues.push("No evidence spans provided".to_string());
        }

        let mut total = 0.0;
        for (i, span) in spans.iter().enumerate() {
            if span.text.trim().is_empty() {
                issues.push(format!("Empty evidence span at index {i}"));
                continue;
            }
            let score = self.similarity(reasoning_text, &span.text);
            debug!(index = i, score, "span alignment");
            if score < self.alignment_threshold {
                issues.push(format!(
                    "Evidence span {i} weakly aligned with reasoning ({score:.2})"
                ));
            }
            total += score;
        }

        let alignment_score = (total / spans.len().max(1) as f64).clamp(0.0, 1.0);
        let is_aligned = alignment_score >= self.alignment_threshold;
        if !is_aligned && !spans.is_empty() {
            issues.push(format!(
                "Mean alignment {alignment_score:.2} below threshold {:.2}",
                self.alignment_threshold
            ));
        }

        ReasoningValidation {
            reasoning_text: reasoning_text.to_string(),
            evidence_spans: spans.to_vec(),
            alignment_score,
            alignment_issues: issues,
            is_aligned,
        }
    }
}

/// Ratcliff/Obershelp matching-blocks ratio over characters.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    // prev[j] = length of the common suffix ending at a[i-1], b[blo+j-1].
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                cur[col] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            } else {
                cur[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

/// Jaccard overlap of whitespace-split token sets.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let a: HashSet<&str> = a.split_whitespace().collect();
    let b: HashSet<&str> = b.split_whitespace().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
