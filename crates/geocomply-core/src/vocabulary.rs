//! Shared compliance vocabulary.
//!
//! One table of term families feeds both the regulation corpus (term
//! indexing) and the evidence quality scorer (term density), so the two
//! can never drift apart.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Family a compliance term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermCategory {
    /// Obligation modals and duty verbs ("shall", "must", "required").
    Obligation,
    /// Prohibition terms ("prohibited", "shall not").
    Prohibition,
    /// Regulatory-framework nouns ("regulation", "directive", "article").
    Framework,
    /// Enforcement nouns ("penalty", "fine", "audit").
    Enforcement,
    /// Protected subjects and data concepts ("minor", "personal data").
    ProtectedSubject,
}

impl TermCategory {
    pub const ALL: [TermCategory; 5] = [
        Self::Obligation,
        Self::Prohibition,
        Self::Framework,
        Self::Enforcement,
        Self::ProtectedSubject,
    ];

    /// Categories counted when scoring evidence strength.
    pub fn is_evidential(&self) -> bool {
        !matches!(self, Self::ProtectedSubject)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obligation => "obligation",
            Self::Prohibition => "prohibition",
            Self::Framework => "framework",
            Self::Enforcement => "enforcement",
            Self::ProtectedSubject => "protected_subject",
        }
    }
}

/// Built-in term table.
pub const STANDARD_TERMS: &[(TermCategory, &[&str])] = &[
    (
        TermCategory::Obligation,
        &[
            "shall", "must", "required", "mandatory", "obligated", "comply", "compliance",
            "ensure", "implement", "establish",
        ],
    ),
    (
        TermCategory::Prohibition,
        &[
            "prohibited", "forbidden", "banned", "restricted", "not permitted", "unlawful",
            "illegal", "shall not", "must not", "may not",
        ],
    ),
    (
        TermCategory::Framework,
        &[
            "regulation", "directive", "act", "statute", "law", "code", "article", "section",
            "provision", "requirement",
        ],
    ),
    (
        TermCategory::Enforcement,
        &[
            "penalty", "fine", "enforcement", "violation", "sanction", "liability", "audit",
            "inspection", "breach", "remedy",
        ],
    ),
    (
        TermCategory::ProtectedSubject,
        &[
            "minor", "minors", "child", "children", "personal data", "consent",
            "parental consent", "age verification", "user data", "geolocation",
        ],
    ),
];

/// A vocabulary term found in some text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TermMatch {
    pub category: TermCategory,
    pub term: String,
}

struct CategoryPattern {
    category: TermCategory,
    terms: Vec<String>,
    pattern: Regex,
}

/// Compiled compliance vocabulary: one case-insensitive, word-bounded
/// alternation per category.
pub struct Vocabulary {
    categories: Vec<CategoryPattern>,
}

impl Vocabulary {
    /// Compile a vocabulary from a category → terms table.
    ///
    /// Terms are matched as whole words, case-insensitively. Longer terms are
    /// tried first so "shall not" wins over "shall" within one category.
    pub fn new(table: &[(TermCategory, &[&str])]) -> Result<Self, regex::Error> {
        let mut categories = Vec::with_capacity(table.len());
        for &(category, terms) in table {
            let mut terms: Vec<String> = terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            terms.dedup();
            if terms.is_empty() {
                continue;
            }

            let alternation = terms
                .iter()
                .map(|t| regex::escape(t).replace(' ', r"\s+"))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                .case_insensitive(true)
                .build()?;

            categories.push(CategoryPattern {
                category,
                terms,
                pattern,
            });
        }
        Ok(Self { categories })
    }

    /// The built-in vocabulary from [`STANDARD_TERMS`].
    pub fn standard() -> Self {
        Self::new(STANDARD_TERMS).expect("standard vocabulary terms are escaped literals")
    }

    /// All distinct terms found in `text`, across every category, sorted.
    pub fn find(&self, text: &str) -> Vec<TermMatch> {
        self.find_in(text, |_| true)
    }

    /// Distinct terms from evidential categories only (see
    /// [`TermCategory::is_evidential`]).
    pub fn find_evidential(&self, text: &str) -> Vec<TermMatch> {
        self.find_in(text, |c| c.is_evidential())
    }

    fn find_in(&self, text: &str, keep: impl Fn(&TermCategory) -> bool) -> Vec<TermMatch> {
        let mut found = BTreeSet::new();
        for cat in self.categories.iter().filter(|c| keep(&c.category)) {
            for m in cat.pattern.find_iter(text) {
                let term = m
                    .as_str()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
                    .join(" ");
                found.insert(TermMatch {
                    category: cat.category,
                    term,
                });
            }
        }
        found.into_iter().collect()
    }

    /// Terms configured for a category.
    pub fn terms(&self, category: TermCategory) -> &[String] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.terms.as_slice())
            .unwrap_or_default()
    }

    /// Total number of configured terms.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("categories", &self.categories.len())
            .field("terms", &self.len())
            .finish()
    }
}
