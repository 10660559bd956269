//! Section extraction from regulation text.
//!
//! Three header shapes are recognised, as alternatives of one pattern:
//! `Section 12`, `§ 2258A`, and a bare `3. ` at the start of a line. Each
//! header owns the text up to the next header (or the end of the document).

use std::collections::BTreeMap;

use regex::Regex;

pub struct SectionExtractor {
    header: Regex,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        let header = Regex::new(
            r"(?m)(?:\b(?i:section)\s+\d+[A-Za-z]?\b|§\s*\d+[A-Za-z]?(?:\.\d+)*|^[ \t]*\d+\.[ \t])",
        )
        .expect("section header pattern is valid");
        Self { header }
    }

    /// Split `content` into `section id → text`.
    ///
    /// Section ids are the header with whitespace collapsed and any trailing
    /// period removed ("Section 3", "§ 5", "2"). When an id repeats (for
    /// example a cross-reference "see Section 2"), the later region is
    /// appended to the earlier one. Regions with no text are dropped.
    pub fn extract(&self, content: &str) -> BTreeMap<String, String> {
        let headers: Vec<_> = self.header.find_iter(content).collect();
        let mut sections: BTreeMap<String, String> = BTreeMap::new();

        for (i, m) in headers.iter().enumerate() {
            let end = headers.get(i + 1).map_or(content.len(), |next| next.start());
            let body = content[m.end()..end].trim();
            if body.is_empty() {
                continue;
            }

            let id = section_id(m.as_str());
            sections
                .entry(id)
                .and_modify(|existing| {
                    existing.push('\n');
                    existing.push_str(body);
                })
                .or_insert_with(|| body.to_string());
        }

        sections
    }
}

fn section_id(header: &str) -> String {
    let collapsed = header.split_whitespace().collect::<Vec<_>>().join(" ");
    let id = collapsed.trim_end_matches('.');
    // Normalise "section 3" → "Section 3" so ids compare stably.
    match id.get(..7) {
        Some(word) if word.eq_ignore_ascii_case("section") => format!("Section{}", &id[7..]),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_section_headers() {
        let text = "Preamble.\nSection 1 Scope of this act.\nSection 2 Operators shall verify age.";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["Section 1"], "Scope of this act.");
        assert_eq!(sections["Section 2"], "Operators shall verify age.");
    }

    #[test]
    fn extracts_paragraph_sign_headers() {
        let text = "§ 2258A Reporting requirements. Providers shall report. §2258B Limited liability.";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections["§ 2258A"], "Reporting requirements. Providers shall report.");
        assert_eq!(sections["§2258B"], "Limited liability.");
    }

    #[test]
    fn extracts_numbered_lines() {
        let text = "1. Definitions apply.\n2. Platforms must not target minors.\nNot a header 3. here";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["1"], "Definitions apply.");
        assert_eq!(sections["2"], "Platforms must not target minors.\nNot a header 3. here");
    }

    #[test]
    fn repeated_ids_are_appended() {
        let text = "Section 1 First part. Section 2 Second. See section 1 for more.";
        let sections = SectionExtractor::new().extract(text);
        assert_eq!(sections["Section 1"], "First part.\nfor more.");
        assert_eq!(sections["Section 2"], "Second. See");
    }

    #[test]
    fn no_headers_yields_empty_map() {
        assert!(SectionExtractor::new().extract("Plain text only.").is_empty());
    }
}
