//! Configuration for the processor and for individual extractions.
//!
//! `ProcessorConfig` is fixed when a [`Processor`](crate::Processor) is built.
//! `ExtractConfig` travels with every call and is part of the cache key, so
//! it serializes to a canonical JSON form.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::url_utils;

/// How images are rendered inline in the extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineImageFormat {
    /// Images do not appear in the text.
    #[default]
    None,
    /// `[Image: alt]`, or `[Image]` when there is no alt text.
    Placeholder,
    /// `![alt](src)`
    Markdown,
    /// `<img src="..." alt="...">`
    Html,
}

impl InlineImageFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Placeholder => "placeholder",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for InlineImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InlineImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "placeholder" => Ok(Self::Placeholder),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            other => Err(Error::invalid_config(
                "inline_image_format",
                format!("unrecognized inline image mode '{other}'"),
            )),
        }
    }
}

/// Per-call extraction configuration.
///
/// # Example
///
/// ```rust
/// use rs_readable::{ExtractConfig, InlineImageFormat};
///
/// let config = ExtractConfig {
///     base_url: Some("https://example.com/blog/".to_string()),
///     inline_image_format: InlineImageFormat::Markdown,
///     ..ExtractConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractConfig {
    /// Run the readability scorer to find the article region.
    ///
    /// When false the whole document body is the extraction scope.
    ///
    /// Default: `true`
    pub extract_article: bool,

    /// Collect `<img>` records.
    ///
    /// Default: `true`
    pub preserve_images: bool,

    /// Collect `<video>` records.
    ///
    /// Default: `true`
    pub preserve_videos: bool,

    /// Collect `<audio>` records.
    ///
    /// Default: `true`
    pub preserve_audios: bool,

    /// Collect anchor records.
    ///
    /// Default: `true`
    pub preserve_links: bool,

    /// Inline rendering of images in the text output.
    ///
    /// Default: `InlineImageFormat::None`
    pub inline_image_format: InlineImageFormat,

    /// Base URL for resolving relative media and link URLs.
    ///
    /// Default: `None`
    pub base_url: Option<String>,

    /// Collect links from the whole document instead of the content root.
    ///
    /// Default: `false`
    pub links_from_whole_document: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            extract_article: true,
            preserve_images: true,
            preserve_videos: true,
            preserve_audios: true,
            preserve_links: true,
            inline_image_format: InlineImageFormat::None,
            base_url: None,
            links_from_whole_document: false,
        }
    }
}

impl ExtractConfig {
    /// Reject configurations that cannot be honored.
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.base_url {
            if url_utils::parse_base_url(base).is_none() {
                return Err(Error::invalid_config(
                    "base_url",
                    format!("'{base}' is not an absolute http(s) URL"),
                ));
            }
        }
        Ok(())
    }

    /// Canonical byte form used when hashing cache keys.
    pub(crate) fn canonical_bytes(&self) -> Vec<u8> {
        // Serializing a plain struct of bools, strings and a unit enum cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Processor-wide configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Largest accepted input in bytes.
    ///
    /// Default: `10 MiB`
    pub max_input_size: usize,

    /// Time budget for one extraction.
    ///
    /// Default: `30s`
    pub processing_timeout: Duration,

    /// Cache capacity in entries. `0` disables caching.
    ///
    /// Default: `1000`
    pub max_cache_entries: usize,

    /// Time after insertion at which a cache entry expires.
    ///
    /// Default: `1h`
    pub cache_ttl: Duration,

    /// Threads in the batch worker pool.
    ///
    /// Default: available parallelism
    pub worker_pool_size: usize,

    /// Skip script, style and other non-content subtrees.
    ///
    /// Default: `true`
    pub enable_sanitization: bool,

    /// Maximum traversal depth.
    ///
    /// Default: `512`
    pub max_depth: usize,

    /// Reading speed used for the reading-time estimate.
    ///
    /// Default: `200`
    pub words_per_minute: u32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_input_size: 10 * 1024 * 1024,
            processing_timeout: Duration::from_secs(30),
            max_cache_entries: 1000,
            cache_ttl: Duration::from_secs(60 * 60),
            worker_pool_size: std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get),
            enable_sanitization: true,
            max_depth: 512,
            words_per_minute: 200,
        }
    }
}

impl ProcessorConfig {
    /// Validate values before a processor is built from them.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_size == 0 {
            return Err(Error::invalid_config("max_input_size", "must be greater than 0"));
        }
        if self.processing_timeout.is_zero() {
            return Err(Error::invalid_config("processing_timeout", "must be greater than 0"));
        }
        if self.max_cache_entries > 0 && self.cache_ttl.is_zero() {
            return Err(Error::invalid_config("cache_ttl", "must be greater than 0 when caching is enabled"));
        }
        if self.worker_pool_size == 0 {
            return Err(Error::invalid_config("worker_pool_size", "must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(Error::invalid_config("max_depth", "must be at least 1"));
        }
        if self.words_per_minute == 0 {
            return Err(Error::invalid_config("words_per_minute", "must be greater than 0"));
        }
        Ok(())
    }
}
