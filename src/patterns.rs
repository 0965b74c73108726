//! Compiled regex patterns.
//!
//! All patterns are compiled once on first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Boilerplate keywords matched against tag names, ids and classes.
///
/// Short keywords (`nav`, `ad`, `ads`) only match as whole tokens so that
/// `header`, `loading` or `canvas-wrapper` stay clean; the longer ones match
/// anywhere (`comment-list`, `left-sidebar`, `advertisement`).
pub static NEGATIVE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[\s_-])(?:nav|ads?)(?:$|[\s_-])|footer|aside|comment|sidebar|advert|sponsor")
        .expect("NEGATIVE_KEYWORDS regex")
});

/// `<meta charset="...">`
pub static CHARSET_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>;]+)"#).expect("CHARSET_META regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">`
pub static CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#)
        .expect("CONTENT_TYPE_CHARSET regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_keywords_match_boilerplate_names() {
        for name in ["nav", "footer", "aside", "site-footer", "comment-list", "left-sidebar", "ad", "top ads", "advertisement", "sponsored-box", "main-nav"] {
            assert!(NEGATIVE_KEYWORDS.is_match(name), "{name}");
        }
    }

    #[test]
    fn negative_keywords_ignore_embedded_short_tokens() {
        for name in ["header", "loading", "canvas", "navigate", "content", "article-body", "readable"] {
            assert!(!NEGATIVE_KEYWORDS.is_match(name), "{name}");
        }
    }

    #[test]
    fn charset_patterns_capture_label() {
        let caps = CHARSET_META.captures(r#"<meta charset="ISO-8859-1">"#).unwrap();
        assert_eq!(&caps[1], "ISO-8859-1");

        let html = r#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1252">"#;
        let caps = CONTENT_TYPE_CHARSET.captures(html).unwrap();
        assert_eq!(&caps[1], "windows-1252");
    }
}
