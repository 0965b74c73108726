//! Plain-text extraction.
//!
//! Text nodes are concatenated in document order. Block elements and `<br>`
//! end the current line; whitespace inside a line collapses to one space.

use url::Url;

use crate::dom::{self, Event, Flow, NodeRef};
use crate::error::Result;
use crate::guard::Guard;
use crate::options::InlineImageFormat;
use crate::tags::TagClass;
use crate::url_utils;

/// Settings for the text pass.
#[derive(Debug, Clone, Copy)]
pub struct TextOptions<'u> {
    pub sanitize: bool,
    pub inline_images: InlineImageFormat,
    pub base_url: Option<&'u Url>,
}

/// Collects finished lines.
#[derive(Default)]
struct LineBuffer {
    lines: Vec<String>,
    current: String,
}

impl LineBuffer {
    fn push(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn push_inline(&mut self, text: &str) {
        self.current.push(' ');
        self.current.push_str(text);
        self.current.push(' ');
    }

    fn flush(&mut self) {
        let line = dom::collapse_whitespace(&self.current);
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.lines.join("\n")
    }
}

/// Extract the text under `root`.
pub fn extract_text(root: NodeRef<'_>, guard: &mut Guard, options: &TextOptions<'_>) -> Result<String> {
    let mut buffer = LineBuffer::default();

    dom::walk(root, guard, |event| {
        match event {
            Event::Open(node, _) => {
                if !node.is_element() {
                    return Flow::Descend;
                }
                let class = dom::tag_class(&node);
                if class == TagClass::Metadata || (options.sanitize && class.is_sanitized()) {
                    return Flow::Skip;
                }
                match class {
                    TagClass::LineBreak => buffer.flush(),
                    TagClass::Image => {
                        if let Some(rendered) = render_image(&node, options) {
                            buffer.push_inline(&rendered);
                        }
                    }
                    c if c.breaks_line() => buffer.flush(),
                    _ => {}
                }
            }
            Event::Close(node) => {
                if dom::tag_class(&node).breaks_line() {
                    buffer.flush();
                }
            }
            Event::Text(node) => buffer.push(&node.text()),
        }
        Flow::Descend
    })?;

    Ok(buffer.finish())
}

fn render_image(node: &NodeRef<'_>, options: &TextOptions<'_>) -> Option<String> {
    if options.inline_images == InlineImageFormat::None {
        return None;
    }
    let src = dom::non_empty_attr(node, "src")
        .or_else(|| dom::non_empty_attr(node, "data-src"))
        .map(|s| url_utils::resolve(&s, options.base_url))
        .unwrap_or_default();
    let alt = dom::attr(node, "alt").map(|a| dom::collapse_whitespace(&a)).unwrap_or_default();

    let rendered = match options.inline_images {
        InlineImageFormat::None => return None,
        InlineImageFormat::Placeholder if alt.is_empty() => "[Image]".to_string(),
        InlineImageFormat::Placeholder => format!("[Image: {alt}]"),
        InlineImageFormat::Markdown => format!("![{alt}]({src})"),
        InlineImageFormat::Html => format!(r#"<img src="{}" alt="{}">"#, escape_attr(&src), escape_attr(&alt)),
    };
    Some(rendered)
}

fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whitespace-delimited tokens.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
