//! End-to-end extraction scenarios.

use rs_readable::{extract, extract_bytes, extract_with_config, ExtractConfig, InlineImageFormat};

const NEWS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Rust 2.0 Released</title>
</head>
<body>
    <header class="site-header"><a href="/">The Daily Crab</a></header>
    <nav class="main-nav">
        <a href="/news">News</a>
        <a href="/sport">Sport</a>
        <a href="/weather">Weather</a>
    </nav>
    <div id="content">
        <article class="story">
            <h1>Rust 2.0 Released</h1>
            <p>The compiler team announced the release today after a long stabilisation period.</p>
            <img src="/img/ferris.png" alt="Ferris waving" width="640" height="480">
            <p>Highlights include faster builds, <a href="https://blog.example.org/notes" title="Notes">detailed notes</a>
               and a refreshed standard library.</p>
            <p>Upgrading existing projects is expected to be painless for most users.</p>
            <video poster="/img/poster.jpg"><source src="/media/keynote.mp4" type="video/mp4"></video>
        </article>
        <aside class="sidebar">
            <h3>Most read</h3>
            <ul>
                <li><a href="/a">Crab prices soar again this quarter</a></li>
                <li><a href="/b">Local man rewrites everything in Rust</a></li>
            </ul>
        </aside>
    </div>
    <div class="comments">
        <p>First! This comment is long enough to look like a paragraph of text.</p>
    </div>
    <footer><p>Copyright 2026 The Daily Crab. All rights reserved.</p></footer>
    <script>trackPageView();</script>
</body>
</html>"#;

#[test]
fn article_scenario_excludes_nav_and_footer() {
    let html = "<html><nav>Nav</nav><article><h1>Hello World</h1><p>Content here and more content to exceed the minimum length threshold.</p></article><footer>Footer</footer></html>";
    let result = extract(html).unwrap();
    assert_eq!(result.title, "Hello World");
    assert!(result.text.contains("Content here and more content to exceed the minimum length threshold."));
    assert!(!result.text.contains("Nav"));
    assert!(!result.text.contains("Footer"));
}

#[test]
fn empty_document_yields_empty_result() {
    let result = extract("<html></html>").unwrap();
    assert_eq!(result.text, "");
    assert_eq!(result.word_count, 0);
    assert_eq!(result.title, "");
    assert!(result.links.is_empty());
    assert!(result.reading_time.is_zero());
}

#[test]
fn nofollow_external_link_with_base_url() {
    let html = r#"<html><body><article><p>Read the reference material for this paragraph:
        <a href="https://other.example/x" rel="nofollow">text</a></p></article></body></html>"#;
    let config = ExtractConfig { base_url: Some("https://example.com".to_string()), ..ExtractConfig::default() };
    let result = extract_with_config(html, &config).unwrap();

    let link = result.links.iter().find(|l| l.href == "https://other.example/x").unwrap();
    assert_eq!(link.text, "text");
    assert!(link.is_external);
    assert!(link.is_nofollow);
}

#[test]
fn news_page_selects_story() {
    let result = extract(NEWS_PAGE).unwrap();
    assert_eq!(result.title, "Rust 2.0 Released");
    assert!(result.text.starts_with("Rust 2.0 Released"));
    assert!(result.text.contains("painless for most users"));
    for boilerplate in ["Weather", "Most read", "First!", "Copyright", "trackPageView"] {
        assert!(!result.text.contains(boilerplate), "{boilerplate} leaked into text");
    }
}

#[test]
fn news_page_media_and_links_are_resolved() {
    let config = ExtractConfig { base_url: Some("https://crab.example/2026/rust/".to_string()), ..ExtractConfig::default() };
    let result = extract_with_config(NEWS_PAGE, &config).unwrap();

    assert_eq!(result.images.len(), 1);
    let image = &result.images[0];
    assert_eq!(image.src, "https://crab.example/img/ferris.png");
    assert_eq!(image.alt.as_deref(), Some("Ferris waving"));
    assert_eq!(image.width.as_deref(), Some("640"));
    assert!(!image.is_decorative);

    assert_eq!(result.videos.len(), 1);
    assert_eq!(result.videos[0].src, "https://crab.example/media/keynote.mp4");
    assert_eq!(result.videos[0].poster.as_deref(), Some("https://crab.example/img/poster.jpg"));
    assert!(result.audios.is_empty());

    assert_eq!(result.links.len(), 1);
    assert_eq!(result.links[0].href, "https://blog.example.org/notes");
    assert_eq!(result.links[0].title.as_deref(), Some("Notes"));
    assert!(result.links[0].is_external);
}

#[test]
fn links_from_whole_document_keep_article_text() {
    let config = ExtractConfig {
        base_url: Some("https://crab.example/".to_string()),
        links_from_whole_document: true,
        ..ExtractConfig::default()
    };
    let result = extract_with_config(NEWS_PAGE, &config).unwrap();
    assert!(!result.text.contains("Weather"));
    assert_eq!(result.links.len(), 7);
    let internal = result.links.iter().filter(|l| !l.is_external).count();
    assert_eq!(internal, 6);
}

#[test]
fn whole_body_when_article_detection_disabled() {
    let config = ExtractConfig { extract_article: false, ..ExtractConfig::default() };
    let result = extract_with_config(NEWS_PAGE, &config).unwrap();
    assert!(result.text.contains("Weather"));
    assert!(result.text.contains("Copyright 2026"));
    assert!(!result.text.contains("trackPageView"));
}

#[test]
fn inline_images_render_in_text() {
    let config = ExtractConfig { inline_image_format: InlineImageFormat::Markdown, ..ExtractConfig::default() };
    let result = extract_with_config(NEWS_PAGE, &config).unwrap();
    assert!(result.text.contains("![Ferris waving](/img/ferris.png)"));

    let config = ExtractConfig { inline_image_format: InlineImageFormat::Placeholder, ..ExtractConfig::default() };
    let result = extract_with_config(NEWS_PAGE, &config).unwrap();
    assert!(result.text.contains("[Image: Ferris waving]"));
}

#[test]
fn word_count_and_reading_time_agree() {
    let result = extract(NEWS_PAGE).unwrap();
    assert_eq!(result.word_count, result.text.split_whitespace().count());
    let expected = result.word_count as f64 * 60.0 / 200.0;
    assert!((result.reading_time.as_secs_f64() - expected).abs() < 1e-6);
    assert!(result.reading_time.as_secs_f64() > 0.0);
}

#[test]
fn title_falls_back_to_heading() {
    let html = "<html><body><main><h1>  Fallback   Title </h1><p>Enough paragraph text to pass the candidate threshold.</p></main></body></html>";
    assert_eq!(extract(html).unwrap().title, "Fallback Title");
}

#[test]
fn latin1_bytes_are_decoded() {
    let html = b"<html><head><meta charset=\"ISO-8859-1\"><title>Caf\xE9</title></head><body><p>Cr\xE8me br\xFBl\xE9e is served after dinner every evening.</p></body></html>";
    let result = extract_bytes(html).unwrap();
    assert_eq!(result.title, "Caf\u{e9}");
    assert!(result.text.contains("Cr\u{e8}me br\u{fb}l\u{e9}e"));
}

#[test]
fn results_serialize_to_json() {
    let result = extract(NEWS_PAGE).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["title"], "Rust 2.0 Released");
    assert!(json["images"].is_array());
}
