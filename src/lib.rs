//! # rs-readable
//!
//! Readable-content extraction from HTML documents.
//!
//! A readability scorer picks the element most likely to hold the primary
//! content of a page. Text, title, media and link extractors then turn that
//! region into a typed [`ExtractResult`]. A [`Processor`] adds a
//! content-addressed LRU + TTL cache, per-instance statistics and a bounded
//! worker pool for batches. Every extraction runs under a resource guard
//! limiting input size, tree depth and wall-clock time.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readable::extract;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><nav>Home | About</nav>
//! <article><p>Main content here, long enough to be scored as content.</p></article></body></html>"#;
//!
//! let result = extract(html)?;
//! assert_eq!(result.title, "My Article");
//! assert!(result.text.contains("Main content here"));
//! assert!(!result.text.contains("Home"));
//! # Ok::<(), rs_readable::Error>(())
//! ```
//!
//! ## Processor
//!
//! ```rust
//! use rs_readable::{ExtractConfig, InlineImageFormat, Processor, ProcessorConfig};
//!
//! let processor = Processor::new(ProcessorConfig { max_cache_entries: 100, ..ProcessorConfig::default() })?;
//! let config = ExtractConfig {
//!     base_url: Some("https://example.com/posts/".to_string()),
//!     inline_image_format: InlineImageFormat::Markdown,
//!     ..ExtractConfig::default()
//! };
//! let result = processor.extract("<article><p>Some article text worth keeping around.</p></article>", &config)?;
//! assert_eq!(result.word_count, 6);
//! # Ok::<(), rs_readable::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (cache hits and misses, content-root
//! selection, batch lifecycle) and never installs a subscriber.

mod batch;
mod error;
mod extract;
mod options;
mod patterns;
mod processor;
mod result;
mod stats;

/// Content-addressed result cache.
pub mod cache;

/// Tree access and guarded traversal over `dom_query` documents.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Text, title, media and link extraction.
pub mod extractor;

/// Input size, depth and time limits.
pub mod guard;

/// Readability scoring and content-root selection.
pub mod scorer;

/// Tag classification table.
pub mod tags;

/// URL resolution and host comparison.
pub mod url_utils;

pub use batch::{BatchOptions, FailurePolicy};
pub use cache::{CacheKey, CacheStats, ResultCache};
pub use error::{Error, Result};
pub use options::{ExtractConfig, InlineImageFormat, ProcessorConfig};
pub use processor::Processor;
pub use result::{ExtractResult, LinkItem, MediaItem};
pub use stats::Statistics;

/// Extract readable content using default settings, without a cache.
///
/// # Example
///
/// ```rust
/// use rs_readable::extract;
///
/// let result = extract("<html><body><article><p>Content paragraph with some words.</p></article></body></html>")?;
/// println!("{}", result.text);
/// # Ok::<(), rs_readable::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract(html: &str) -> Result<ExtractResult> {
    extract_with_config(html, &ExtractConfig::default())
}

/// Extract readable content with a custom [`ExtractConfig`], without a cache.
///
/// Processor-level limits are the [`ProcessorConfig`] defaults.
#[allow(clippy::missing_errors_doc)]
pub fn extract_with_config(html: &str, config: &ExtractConfig) -> Result<ExtractResult> {
    extract::extract_uncached(html, config, &ProcessorConfig::default())
}

/// Extract from raw bytes with charset detection, without a cache.
///
/// # Example
///
/// ```rust
/// use rs_readable::extract_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><article><p>Caf\xE9 culture, a long enough paragraph.</p></article></body></html>";
/// let result = extract_bytes(html)?;
/// assert!(result.text.contains("Caf\u{e9}"));
/// # Ok::<(), rs_readable::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(html: &[u8]) -> Result<ExtractResult> {
    extract::extract_bytes_uncached(html, &ExtractConfig::default(), &ProcessorConfig::default())
}
