//! Link extraction.

use url::Url;

use crate::dom::{self, Event, Flow, NodeRef};
use crate::error::Result;
use crate::guard::Guard;
use crate::result::LinkItem;
use crate::tags::TagClass;
use crate::url_utils;

/// Collect `a` / `area` elements with an `href` under `root`.
pub fn extract_links(root: NodeRef<'_>, guard: &mut Guard, sanitize: bool, base: Option<&Url>) -> Result<Vec<LinkItem>> {
    let mut links: Vec<LinkItem> = Vec::new();
    // Anchors still open: node id, index into `links`, raw text so far.
    let mut open: Vec<(dom_query::NodeId, usize, String)> = Vec::new();

    dom::walk(root, guard, |event| {
        match event {
            Event::Open(node, _) => {
                if !node.is_element() {
                    return Flow::Descend;
                }
                let class = dom::tag_class(&node);
                if class == TagClass::Metadata || (sanitize && class.is_sanitized()) {
                    return Flow::Skip;
                }
                if class == TagClass::Link {
                    if let Some(item) = link_item(&node, base) {
                        let initial = if dom::tag_name(&node).as_deref() == Some("area") {
                            dom::attr(&node, "alt").unwrap_or_default()
                        } else {
                            String::new()
                        };
                        open.push((node.id, links.len(), initial));
                        links.push(item);
                    }
                }
            }
            Event::Text(node) => {
                let text = node.text();
                for (_, _, buffer) in &mut open {
                    buffer.push_str(&text);
                }
            }
            Event::Close(node) => {
                if open.last().is_some_and(|(id, _, _)| *id == node.id) {
                    if let Some((_, index, raw)) = open.pop() {
                        links[index].text = dom::collapse_whitespace(&raw);
                    }
                }
            }
        }
        Flow::Descend
    })?;

    Ok(links)
}

fn link_item(node: &NodeRef<'_>, base: Option<&Url>) -> Option<LinkItem> {
    let href = dom::non_empty_attr(node, "href")?;
    let href = url_utils::resolve(&href, base);
    Some(LinkItem {
        is_external: url_utils::is_external(&href, base),
        is_nofollow: dom::attr(node, "rel").is_some_and(|rel| has_nofollow(&rel)),
        title: dom::attr(node, "title"),
        text: String::new(),
        href,
    })
}

/// `nofollow` among space-separated `rel` tokens, case-insensitive.
fn has_nofollow(rel: &str) -> bool {
    rel.split_whitespace().any(|token| token.eq_ignore_ascii_case("nofollow"))
}
