//! URL-shape heuristic
//!
//! Used only to gate the default suggestion cursor and the Enter/paste fetch
//! path. It is deliberately permissive and never used for network validation.

use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((https|http)?://.*)|^(www\..*)").unwrap());

/// Returns true when `text` looks like a URL the user wants to embed.
///
/// Matches `http://…`, `https://…`, a bare `://…` and anything starting with
/// `www.`. The scheme token is case-sensitive.
///
/// # Examples
///
/// ```
/// use smartlink_core::utils::is_url;
///
/// assert!(is_url("https://example.com"));
/// assert!(is_url("www.example.com"));
/// assert!(!is_url("hello world"));
/// assert!(!is_url("ftp://x"));
/// ```
pub fn is_url(text: &str) -> bool {
    URL_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_https() {
        assert!(is_url("http://example.com"));
        assert!(is_url("https://site.example/page?q=1"));
    }

    #[test]
    fn test_www_prefix() {
        assert!(is_url("www.example.com"));
        assert!(!is_url("wwwexample.com"));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert!(!is_url("HTTPS://example.com"));
        assert!(!is_url("Www.example.com"));
    }

    #[test]
    fn test_non_urls() {
        assert!(!is_url("hello world"));
        assert!(!is_url("ftp://x"));
        assert!(!is_url(""));
        assert!(!is_url(" https://leading-space.example"));
    }

    #[test]
    fn test_schemeless_separator_is_accepted() {
        assert!(is_url("://odd"));
    }
}
