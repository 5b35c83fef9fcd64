//! Markup stripping for free-text catalog fields.
//!
//! Abstracts arrive as raw HTML fragments. The dashboard and the topic pass
//! only need searchable text, so tags are dropped outright and each
//! entity-style escape (`&amp;`, `&#8217;`, …) collapses to a single space.
//! The transform is lossy and one-way; it is never written back.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").expect("hardcoded regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#?[0-9a-zA-Z]+;").expect("hardcoded regex"));

/// Strip markup tags, replace each entity escape with one space, trim.
/// Absent input yields the empty string.
pub fn clean_markup(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let without_tags = TAG_RE.replace_all(text, "");
    let without_entities = ENTITY_RE.replace_all(&without_tags, " ");
    without_entities.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_entities() {
        assert_eq!(clean_markup(Some("<p>AI &amp; ML</p>")), "AI   ML");
    }

    #[test]
    fn test_absent_input_is_empty() {
        assert_eq!(clean_markup(None), "");
        assert_eq!(clean_markup(Some("")), "");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(clean_markup(Some("it&#8217;s here")), "it s here");
    }

    #[test]
    fn test_nested_markup() {
        assert_eq!(
            clean_markup(Some("<div><strong>Kubernetes</strong> at scale</div>")),
            "Kubernetes at scale"
        );
    }

    #[test]
    fn test_inner_whitespace_preserved() {
        // Only the ends are trimmed; interior spacing stays as produced.
        assert_eq!(clean_markup(Some("  a &lt; b  ")), "a   b");
    }
}
