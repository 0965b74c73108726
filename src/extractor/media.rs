//! Image, video and audio extraction.

use url::Url;

use crate::dom::{self, Event, Flow, NodeRef};
use crate::error::Result;
use crate::guard::Guard;
use crate::result::MediaItem;
use crate::tags::TagClass;
use crate::url_utils;

/// Which media kinds to collect.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct MediaOptions<'u> {
    pub images: bool,
    pub videos: bool,
    pub audios: bool,
    pub sanitize: bool,
    pub base_url: Option<&'u Url>,
}

impl MediaOptions<'_> {
    fn any(&self) -> bool {
        self.images || self.videos || self.audios
    }
}

/// Media records in document order, per kind.
#[derive(Debug, Default)]
pub struct Media {
    pub images: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub audios: Vec<MediaItem>,
}

/// Collect media elements under `root`.
pub fn extract_media(root: NodeRef<'_>, guard: &mut Guard, options: &MediaOptions<'_>) -> Result<Media> {
    let mut media = Media::default();
    if !options.any() {
        return Ok(media);
    }

    dom::walk(root, guard, |event| {
        let Event::Open(node, _) = event else {
            return Flow::Descend;
        };
        if !node.is_element() {
            return Flow::Descend;
        }
        match dom::tag_class(&node) {
            TagClass::Metadata => return Flow::Skip,
            class if options.sanitize && class.is_sanitized() => return Flow::Skip,
            TagClass::Image if options.images => media.images.push(image_item(&node, options.base_url)),
            TagClass::Video if options.videos => media.videos.push(playable_item(&node, options.base_url)),
            TagClass::Audio if options.audios => media.audios.push(playable_item(&node, options.base_url)),
            _ => {}
        }
        Flow::Descend
    })?;

    Ok(media)
}

fn image_item(node: &NodeRef<'_>, base: Option<&Url>) -> MediaItem {
    let src = dom::non_empty_attr(node, "src").or_else(|| dom::non_empty_attr(node, "data-src"));
    item_with_src(node, src, base)
}

/// `video` / `audio`: own `src`, else the first `<source>` child that has one.
fn playable_item(node: &NodeRef<'_>, base: Option<&Url>) -> MediaItem {
    let src = dom::non_empty_attr(node, "src").or_else(|| first_source_src(node));
    let mut item = item_with_src(node, src, base);
    item.poster = dom::non_empty_attr(node, "poster").map(|p| url_utils::resolve(&p, base));
    item
}

fn first_source_src(node: &NodeRef<'_>) -> Option<String> {
    let mut child = node.first_child();
    while let Some(c) = child {
        if c.is_element() && dom::tag_name(&c).as_deref() == Some("source") {
            if let Some(src) = dom::non_empty_attr(&c, "src") {
                return Some(src);
            }
        }
        child = c.next_sibling();
    }
    None
}

fn item_with_src(node: &NodeRef<'_>, src: Option<String>, base: Option<&Url>) -> MediaItem {
    let alt = dom::attr(node, "alt");
    let is_decorative = alt.as_deref().is_none_or(|a| a.trim().is_empty());
    MediaItem {
        src: src.map(|s| url_utils::resolve(&s, base)).unwrap_or_default(),
        alt,
        title: dom::attr(node, "title"),
        width: dom::attr(node, "width"),
        height: dom::attr(node, "height"),
        poster: None,
        is_decorative,
    }
}
