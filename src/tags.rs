//! Tag classification table.
//!
//! Maps lowercase tag names to a small classification used by every
//! traversal. Built once on first use; unknown tags are `Inline`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Role of an element tag during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Inline content; text flows through.
    Inline,
    /// Block element that breaks lines but is not scored.
    Block,
    /// Block element that can be a content candidate.
    Candidate,
    /// Candidate carrying a positive semantic signal.
    SemanticCandidate,
    /// Document title element.
    Title,
    /// Top-level heading.
    Heading1,
    /// Lower-level heading (h2-h6).
    Heading,
    /// Forced line break.
    LineBreak,
    /// `img`
    Image,
    /// `video`
    Video,
    /// `audio`
    Audio,
    /// `a`, `area`
    Link,
    /// `script`, `style` and friends: skipped when sanitizing.
    Script,
    /// Non-content subtrees skipped when sanitizing.
    Excluded,
    /// `head`: never part of the content.
    Metadata,
}

impl TagClass {
    /// Whether this element ends the current text line.
    #[must_use]
    pub fn breaks_line(self) -> bool {
        matches!(
            self,
            Self::Block | Self::Candidate | Self::SemanticCandidate | Self::Heading1 | Self::Heading | Self::Title
        )
    }

    /// Whether the scorer treats this element as a candidate.
    #[must_use]
    pub fn is_candidate(self) -> bool {
        matches!(self, Self::Candidate | Self::SemanticCandidate)
    }

    /// Whether the subtree is skipped when sanitization is on.
    #[must_use]
    pub fn is_sanitized(self) -> bool {
        matches!(self, Self::Script | Self::Excluded)
    }
}

const CANDIDATE_TAGS: [&str; 6] = ["p", "pre", "blockquote", "div", "td", "th"];

const SEMANTIC_TAGS: [&str; 3] = ["article", "section", "main"];

const BLOCK_TAGS: [&str; 24] = [
    "address", "aside", "body", "dd", "details", "dialog", "dl", "dt", "fieldset", "figcaption", "figure",
    "footer", "form", "header", "hr", "html", "li", "nav", "ol", "summary", "table", "tr", "ul", "caption",
];

const HEADING_TAGS: [&str; 5] = ["h2", "h3", "h4", "h5", "h6"];

const SCRIPT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

const EXCLUDED_TAGS: [&str; 5] = ["iframe", "object", "embed", "svg", "canvas"];

static TAG_TABLE: LazyLock<HashMap<&'static str, TagClass>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    table.extend(BLOCK_TAGS.iter().map(|t| (*t, TagClass::Block)));
    table.extend(CANDIDATE_TAGS.iter().map(|t| (*t, TagClass::Candidate)));
    table.extend(SEMANTIC_TAGS.iter().map(|t| (*t, TagClass::SemanticCandidate)));
    table.extend(HEADING_TAGS.iter().map(|t| (*t, TagClass::Heading)));
    table.extend(SCRIPT_TAGS.iter().map(|t| (*t, TagClass::Script)));
    table.extend(EXCLUDED_TAGS.iter().map(|t| (*t, TagClass::Excluded)));
    table.insert("h1", TagClass::Heading1);
    table.insert("title", TagClass::Title);
    table.insert("br", TagClass::LineBreak);
    table.insert("img", TagClass::Image);
    table.insert("video", TagClass::Video);
    table.insert("audio", TagClass::Audio);
    table.insert("a", TagClass::Link);
    table.insert("area", TagClass::Link);
    table.insert("head", TagClass::Metadata);
    table
});

/// Classify a tag name (case-insensitive).
#[must_use]
pub fn classify(tag: &str) -> TagClass {
    if let Some(class) = TAG_TABLE.get(tag) {
        return *class;
    }
    if tag.bytes().any(|b| b.is_ascii_uppercase()) {
        let lower = tag.to_ascii_lowercase();
        return TAG_TABLE.get(lower.as_str()).copied().unwrap_or(TagClass::Inline);
    }
    TagClass::Inline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_tags() {
        assert_eq!(classify("p"), TagClass::Candidate);
        assert_eq!(classify("article"), TagClass::SemanticCandidate);
        assert_eq!(classify("script"), TagClass::Script);
        assert_eq!(classify("svg"), TagClass::Excluded);
        assert_eq!(classify("a"), TagClass::Link);
        assert_eq!(classify("h1"), TagClass::Heading1);
        assert_eq!(classify("head"), TagClass::Metadata);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("DIV"), TagClass::Candidate);
        assert_eq!(classify("Main"), TagClass::SemanticCandidate);
    }

    #[test]
    fn test_unknown_tags_are_inline() {
        assert_eq!(classify("span"), TagClass::Inline);
        assert_eq!(classify("custom-element"), TagClass::Inline);
    }

    #[test]
    fn test_line_breaking_classes() {
        assert!(classify("li").breaks_line());
        assert!(classify("h3").breaks_line());
        assert!(!classify("em").breaks_line());
        assert!(classify("noscript").is_sanitized());
        assert!(!classify("head").is_sanitized());
    }
}
