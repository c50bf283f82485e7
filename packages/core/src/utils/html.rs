//! Tag stripping for free-text fields
//!
//! Labels and preview text arrive from suggesters and metadata resolvers that
//! may hand back highlighted or marked-up snippets. Stored records only ever
//! hold plain text.

use regex::Regex;
use std::sync::LazyLock;

/// Matches anything that looks like an opening or closing tag, lazily up to
/// the first `>` on the same line.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?.+?>").unwrap());

/// Remove HTML-like tags from `content`, leaving the text between them.
///
/// Entities are not decoded and whitespace is left untouched.
///
/// # Examples
///
/// ```
/// use smartlink_core::utils::strip_tags;
///
/// assert_eq!(strip_tags("<em>Quarterly</em> report"), "Quarterly report");
/// assert_eq!(strip_tags("plain"), "plain");
/// assert_eq!(strip_tags("<b></b>"), "");
/// ```
pub fn strip_tags(content: &str) -> String {
    if !content.contains('<') {
        return content.to_string();
    }
    TAG_RE.replace_all(content, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_simple_tags() {
        assert_eq!(strip_tags("<p>Hello</p>"), "Hello");
        assert_eq!(strip_tags("a <span class=\"hl\">b</span> c"), "a b c");
    }

    #[test]
    fn test_strip_self_closing_and_nested() {
        assert_eq!(strip_tags("line<br/>break"), "linebreak");
        assert_eq!(strip_tags("<div><em>deep</em></div>"), "deep");
    }

    #[test]
    fn test_strip_leaves_comparisons_alone() {
        // A lone `<` without a closing `>` is not a tag
        assert_eq!(strip_tags("a < b"), "a < b");
    }

    #[test]
    fn test_strip_empty() {
        assert_eq!(strip_tags(""), "");
        assert_eq!(strip_tags("<i></i>"), "");
    }
}
