//! Regulation corpus loading and name resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use geocomply_core::{Vocabulary, normalize_regulation_name};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::CorpusError;
use crate::sections::SectionExtractor;

/// One regulation loaded from `<key>.txt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulationEntry {
    /// Filename stem, used for lookups and citations.
    pub key: String,
    pub path: PathBuf,
    pub content: String,
    /// section id → section text
    pub sections: BTreeMap<String, String>,
    /// Distinct vocabulary terms found in the content, sorted.
    pub compliance_terms: Vec<String>,
}

/// Outcome of resolving a cited regulation name against the corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Key equals the normalised name (ignoring case).
    Exact(&'a RegulationEntry),
    /// Unique longest key contained in, or containing, the normalised name.
    Partial(&'a RegulationEntry),
    /// Several keys tie for the longest partial match.
    Ambiguous,
    NotFound,
}

/// Read-only set of regulations, held in sorted key order.
#[derive(Debug, Default)]
pub struct RegulationCorpus {
    entries: Vec<RegulationEntry>,
}

impl RegulationCorpus {
    /// An empty corpus.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `*.txt` file in `dir`.
    ///
    /// Files are visited in sorted path order. A file that cannot be read
    /// (or is not UTF-8) is skipped with a warning; only a missing or
    /// unlistable directory is an error.
    pub fn load(dir: &Path, vocabulary: &Vocabulary) -> Result<Self, CorpusError> {
        if !dir.exists() {
            return Err(CorpusError::DirectoryNotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(CorpusError::NotADirectory(dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| match entry {
                Ok(e) => Some(e.path()),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        paths.sort();

        let extractor = SectionExtractor::new();
        let mut entries = Vec::with_capacity(paths.len());

        for path in paths {
            let Some(key) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable regulation file"
                    );
                    continue;
                }
            };

            let entry = RegulationEntry::build(key, path, content, &extractor, vocabulary);
            debug!(
                key = %entry.key,
                sections = entry.sections.len(),
                terms = entry.compliance_terms.len(),
                "loaded regulation"
            );
            entries.push(entry);
        }

        let corpus = Self::from_entries(entries);
        info!(count = corpus.len(), dir = %dir.display(), "loaded regulation corpus");
        Ok(corpus)
    }

    /// Like [`load`](Self::load), but a directory-level failure yields an
    /// empty corpus with a warning.
    pub fn load_or_empty(dir: &Path, vocabulary: &Vocabulary) -> Self {
        Self::load(dir, vocabulary).unwrap_or_else(|e| {
            warn!(error = %e, "regulation corpus unavailable, continuing with empty corpus");
            Self::empty()
        })
    }

    /// Build a corpus from in-memory texts, keyed by name.
    pub fn from_texts<'a>(
        texts: impl IntoIterator<Item = (&'a str, &'a str)>,
        vocabulary: &Vocabulary,
    ) -> Self {
        let extractor = SectionExtractor::new();
        let entries = texts
            .into_iter()
            .map(|(key, content)| {
                RegulationEntry::build(
                    key.to_string(),
                    PathBuf::from(format!("{key}.txt")),
                    content.to_string(),
                    &extractor,
                    vocabulary,
                )
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(mut entries: Vec<RegulationEntry>) -> Self {
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries.dedup_by(|later, earlier| {
            let dup = later.key == earlier.key;
            if dup {
                warn!(key = %later.key, "duplicate regulation key, keeping first");
            }
            dup
        });
        Self { entries }
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&RegulationEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Resolve a cited regulation name.
    ///
    /// The name is normalised with [`normalize_regulation_name`], then:
    ///
    /// 1. a key equal to it (ignoring case) is an exact match;
    /// 2. otherwise keys containing it, or contained in it (ignoring case),
    ///    are candidates and the longest key wins;
    /// 3. a tie for longest is [`Resolution::Ambiguous`].
    ///
    /// Names that normalise to empty never match.
    pub fn resolve(&self, reference: &str) -> Resolution<'_> {
        let normalized = normalize_regulation_name(reference).to_lowercase();
        if normalized.is_empty() {
            return Resolution::NotFound;
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.key.to_lowercase() == normalized)
        {
            return Resolution::Exact(entry);
        }

        let mut best: Vec<&RegulationEntry> = Vec::new();
        let mut best_len = 0;
        for entry in &self.entries {
            let key = entry.key.to_lowercase();
            if key.is_empty() || !(key.contains(&normalized) || normalized.contains(&key)) {
                continue;
            }
            let len = key.chars().count();
            if len > best_len {
                best_len = len;
                best.clear();
                best.push(entry);
            } else if len == best_len {
                best.push(entry);
            }
        }

        match best.as_slice() {
            [] => Resolution::NotFound,
            [only] => Resolution::Partial(only),
            _ => Resolution::Ambiguous,
        }
    }

    /// Keys of every entry tied for the longest partial match, for
    /// explaining an ambiguous resolution.
    pub fn candidates(&self, reference: &str) -> Vec<&str> {
        let normalized = normalize_regulation_name(reference).to_lowercase();
        if normalized.is_empty() {
            return Vec::new();
        }
        let matching: Vec<&RegulationEntry> = self
            .entries
            .iter()
            .filter(|e| {
                let key = e.key.to_lowercase();
                !key.is_empty() && (key.contains(&normalized) || normalized.contains(&key))
            })
            .collect();
        let longest = matching
            .iter()
            .map(|e| e.key.chars().count())
            .max()
            .unwrap_or(0);
        matching
            .into_iter()
            .filter(|e| e.key.chars().count() == longest)
            .map(|e| e.key.as_str())
            .collect()
    }

    pub fn entries(&self) -> &[RegulationEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RegulationEntry {
    fn build(
        key: String,
        path: PathBuf,
        content: String,
        extractor: &SectionExtractor,
        vocabulary: &Vocabulary,
    ) -> Self {
        let sections = extractor.extract(&content);
        let mut compliance_terms: Vec<String> = vocabulary
            .find(&content)
            .into_iter()
            .map(|m| m.term)
            .collect();
        compliance_terms.sort();
        compliance_terms.dedup();

        Self {
            key,
            path,
            content,
            sections,
            compliance_terms,
        }
    }
}
