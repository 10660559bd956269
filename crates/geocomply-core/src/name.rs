//! Regulation name normalisation.
//!
//! Citations arrive in many shapes ("the GDPR", "Act GDPR", " Regulation
//! 2016/679 "). Before matching against corpus keys the leading filler
//! words are stripped.
//!
//! # Algorithm
//!
//! 1. Trim surrounding whitespace.
//! 2. Repeatedly strip any leading prefix from [`NAME_PREFIXES`], compared
//!    ASCII case-insensitively. Bare-word prefixes only strip when followed
//!    by a non-alphanumeric character or the end of the string, so "Lawful"
//!    and "Codex" are left intact.
//! 3. Trim again after each strip.

/// Leading filler stripped from cited regulation names.
pub const NAME_PREFIXES: &[&str] = &["the ", "act", "regulation", "statute", "law", "code"];

/// Normalise a cited regulation name for corpus lookup.
///
/// Returns an empty string when nothing but filler remains.
pub fn normalize_regulation_name(s: &str) -> String {
    let mut rest = s.trim();

    'strip: loop {
        for prefix in NAME_PREFIXES {
            if let Some(stripped) = strip_prefix_word(rest, prefix) {
                rest = stripped.trim_start();
                continue 'strip;
            }
        }
        break;
    }

    rest.trim_end().to_string()
}

fn strip_prefix_word<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let tail = &s[prefix.len()..];
    let at_boundary = prefix.ends_with(' ')
        || tail
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
    at_boundary.then_some(tail)
}
