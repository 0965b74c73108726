//! Extraction pipeline.
//!
//! Parses the document, picks the content root, runs the sub-extractors over
//! it and assembles the result. Every traversal shares one [`Guard`], so the
//! time budget covers the whole call.

use std::time::{Duration, Instant};

use crate::dom;
use crate::encoding;
use crate::error::Result;
use crate::extractor::{count_words, extract_links, extract_media, extract_text, extract_title, MediaOptions, TextOptions};
use crate::guard::{self, Guard};
use crate::options::{ExtractConfig, ProcessorConfig};
use crate::result::ExtractResult;
use crate::scorer;
use crate::url_utils;

/// Run the full pipeline over `html`.
///
/// Input size and config validity are checked by the caller.
pub(crate) fn extract_content(
    html: &str,
    config: &ExtractConfig,
    settings: &ProcessorConfig,
    guard: &mut Guard,
) -> Result<ExtractResult> {
    let started = Instant::now();
    guard.check()?;

    let document = dom::parse(html)?;
    let sanitize = settings.enable_sanitization;
    let base = config.base_url.as_deref().and_then(url_utils::parse_base_url);
    let body = dom::find_body(&document).unwrap_or_else(|| document.root());

    let root = if config.extract_article {
        scorer::find_content_root(&document, guard, sanitize)?.root
    } else {
        body
    };

    let text = extract_text(
        root,
        guard,
        &TextOptions { sanitize, inline_images: config.inline_image_format, base_url: base.as_ref() },
    )?;
    let title = extract_title(&document, root, guard, sanitize)?;
    let media = extract_media(
        root,
        guard,
        &MediaOptions {
            images: config.preserve_images,
            videos: config.preserve_videos,
            audios: config.preserve_audios,
            sanitize,
            base_url: base.as_ref(),
        },
    )?;

    let links = if config.preserve_links {
        let scope = if config.links_from_whole_document { document.root() } else { root };
        extract_links(scope, guard, sanitize, base.as_ref())?
    } else {
        Vec::new()
    };

    let word_count = count_words(&text);
    let result = ExtractResult {
        text,
        title,
        images: media.images,
        videos: media.videos,
        audios: media.audios,
        links,
        word_count,
        reading_time: reading_time(word_count, settings.words_per_minute),
        processing_time: started.elapsed(),
    };

    tracing::debug!(
        words = result.word_count,
        images = result.images.len(),
        links = result.links.len(),
        elapsed_us = u64::try_from(result.processing_time.as_micros()).unwrap_or(u64::MAX),
        "extraction complete"
    );
    Ok(result)
}

/// Standalone extraction with no cache or statistics.
pub(crate) fn extract_uncached(html: &str, config: &ExtractConfig, settings: &ProcessorConfig) -> Result<ExtractResult> {
    guard::check_input_size(html.len(), settings.max_input_size)?;
    extract_sized(html, config, settings)
}

/// Standalone extraction from raw bytes. The size limit applies to the bytes,
/// not to the decoded text.
pub(crate) fn extract_bytes_uncached(html: &[u8], config: &ExtractConfig, settings: &ProcessorConfig) -> Result<ExtractResult> {
    guard::check_input_size(html.len(), settings.max_input_size)?;
    extract_sized(&encoding::transcode_to_utf8(html), config, settings)
}

fn extract_sized(html: &str, config: &ExtractConfig, settings: &ProcessorConfig) -> Result<ExtractResult> {
    config.validate()?;
    let mut guard = Guard::new(settings.max_depth, settings.processing_timeout);
    extract_content(html, config, settings, &mut guard)
}

/// `words / words_per_minute` minutes, fractional minutes kept.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn reading_time(words: usize, words_per_minute: u32) -> Duration {
    if words_per_minute == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(words as f64 * 60.0 / f64::from(words_per_minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::options::InlineImageFormat;

    const ARTICLE: &str = r#"<html><head><title>Hello World</title></head><body>
        <nav><a href="/">Home</a> <a href="/about">About</a></nav>
        <article>
            <h1>Hello World</h1>
            <p>This is the first paragraph of the article with enough text.</p>
            <p>A second paragraph links <a href="https://other.example/ref">a reference</a>.</p>
            <img src="/chart.png" alt="Chart">
        </article>
        <footer>Copyright <a href="/legal">Legal</a></footer>
    </body></html>"#;

    fn run(config: &ExtractConfig) -> ExtractResult {
        extract_uncached(ARTICLE, config, &ProcessorConfig::default()).unwrap()
    }

    #[test]
    fn test_article_scope_excludes_boilerplate() {
        let result = run(&ExtractConfig::default());
        assert_eq!(result.title, "Hello World");
        assert!(result.text.contains("first paragraph"));
        assert!(!result.text.contains("Home"));
        assert!(!result.text.contains("Copyright"));
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.word_count, result.text.split_whitespace().count());
    }

    #[test]
    fn test_whole_document_scope() {
        let config = ExtractConfig { extract_article: false, ..ExtractConfig::default() };
        let result = run(&config);
        assert!(result.text.contains("Home"));
        assert!(result.text.contains("Copyright"));
        assert_eq!(result.links.len(), 4);
    }

    #[test]
    fn test_links_from_whole_document() {
        let config = ExtractConfig { links_from_whole_document: true, ..ExtractConfig::default() };
        let result = run(&config);
        assert!(!result.text.contains("Home"));
        let hrefs: Vec<_> = result.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, ["/", "/about", "https://other.example/ref", "/legal"]);
    }

    #[test]
    fn test_disabled_collections_are_empty() {
        let config = ExtractConfig {
            preserve_images: false,
            preserve_links: false,
            inline_image_format: InlineImageFormat::Placeholder,
            ..ExtractConfig::default()
        };
        let result = run(&config);
        assert!(result.images.is_empty());
        assert!(result.links.is_empty());
        assert!(result.text.contains("[Image: Chart]"));
    }

    #[test]
    fn test_base_url_resolves_media_and_links() {
        let config = ExtractConfig { base_url: Some("https://example.com/post/".to_string()), ..ExtractConfig::default() };
        let result = run(&config);
        assert_eq!(result.images[0].src, "https://example.com/chart.png");
        assert!(result.links[0].is_external);
    }

    #[test]
    fn test_reading_time_keeps_fractional_minutes() {
        assert_eq!(reading_time(100, 200), Duration::from_secs(30));
        assert_eq!(reading_time(0, 200), Duration::ZERO);
        assert_eq!(reading_time(450, 200), Duration::from_secs(135));
    }

    #[test]
    fn test_size_checked_before_parsing() {
        let settings = ProcessorConfig { max_input_size: 8, ..ProcessorConfig::default() };
        let err = extract_uncached(ARTICLE, &ExtractConfig::default(), &settings).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { max: 8, .. }));
    }

    #[test]
    fn test_byte_limit_applies_before_decoding() {
        // Each 0xE9 byte decodes to two UTF-8 bytes.
        let mut html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><p>".to_vec();
        html.extend(std::iter::repeat(0xE9).take(200));
        html.extend_from_slice(b"</p></body></html>");
        let settings = ProcessorConfig { max_input_size: html.len(), ..ProcessorConfig::default() };

        let result = extract_bytes_uncached(&html, &ExtractConfig::default(), &settings).unwrap();
        assert!(result.text.contains('\u{e9}'));

        let too_small = ProcessorConfig { max_input_size: html.len() - 1, ..ProcessorConfig::default() };
        let err = extract_bytes_uncached(&html, &ExtractConfig::default(), &too_small).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { .. }));
    }
}
