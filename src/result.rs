//! Result types for extraction output.
//!
//! An [`ExtractResult`] is immutable once returned. The cache may hold a
//! second, read-only copy of the same value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// An image, video or audio element found in the extraction scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Resolved source URL (falls back to `data-src` or a `<source>` child).
    pub src: String,

    /// `alt` attribute, verbatim.
    pub alt: Option<String>,

    /// `title` attribute, verbatim.
    pub title: Option<String>,

    /// `width` attribute, verbatim (no unit coercion).
    pub width: Option<String>,

    /// `height` attribute, verbatim (no unit coercion).
    pub height: Option<String>,

    /// Resolved `poster` URL (video only).
    pub poster: Option<String>,

    /// True when the element has no alt text or an empty one.
    pub is_decorative: bool,
}

/// An anchor found in the extraction scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    /// Resolved target URL.
    pub href: String,

    /// Anchor text with whitespace collapsed.
    pub text: String,

    /// `title` attribute, verbatim.
    pub title: Option<String>,

    /// Target host differs from the page host.
    pub is_external: bool,

    /// `rel` contains the `nofollow` token.
    pub is_nofollow: bool,
}

/// Result of content extraction from an HTML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Main content as plain text, one block per line.
    pub text: String,

    /// Document title, or the first `h1` of the content; empty when neither exists.
    pub title: String,

    /// Images in document order.
    pub images: Vec<MediaItem>,

    /// Videos in document order.
    pub videos: Vec<MediaItem>,

    /// Audio elements in document order.
    pub audios: Vec<MediaItem>,

    /// Links in document order.
    pub links: Vec<LinkItem>,

    /// Number of whitespace-delimited tokens in `text`.
    pub word_count: usize,

    /// Estimated reading time at the processor's words-per-minute rate.
    pub reading_time: Duration,

    /// Wall-clock time spent producing this result.
    pub processing_time: Duration,
}
