//! Title extraction.

use crate::dom::{self, Document, Event, Flow, NodeRef};
use crate::error::Result;
use crate::guard::Guard;
use crate::tags::TagClass;

/// Document title, falling back to the first `h1` under `content_root`.
///
/// Yields an empty string when neither exists.
pub fn extract_title(document: &Document, content_root: NodeRef<'_>, guard: &mut Guard, sanitize: bool) -> Result<String> {
    if let Some(title) = document_title(document.root(), guard)? {
        return Ok(title);
    }
    Ok(first_heading(content_root, guard, sanitize)?.unwrap_or_default())
}

/// First non-empty `<title>` outside embedded SVG/MathML-like subtrees.
fn document_title(root: NodeRef<'_>, guard: &mut Guard) -> Result<Option<String>> {
    let mut found = None;
    dom::walk(root, guard, |event| {
        let Event::Open(node, _) = event else {
            return Flow::Descend;
        };
        match dom::tag_class(&node) {
            TagClass::Script | TagClass::Excluded => Flow::Skip,
            TagClass::Title if node.is_element() => {
                let text = dom::collapse_whitespace(&node.text());
                if text.is_empty() {
                    Flow::Skip
                } else {
                    found = Some(text);
                    Flow::Stop
                }
            }
            _ => Flow::Descend,
        }
    })?;
    Ok(found)
}

/// First non-empty `<h1>` under `root`.
pub fn first_heading(root: NodeRef<'_>, guard: &mut Guard, sanitize: bool) -> Result<Option<String>> {
    let mut found = None;
    dom::walk(root, guard, |event| {
        let Event::Open(node, _) = event else {
            return Flow::Descend;
        };
        let class = dom::tag_class(&node);
        if sanitize && class.is_sanitized() {
            return Flow::Skip;
        }
        if class == TagClass::Heading1 && node.is_element() {
            let text = dom::collapse_whitespace(&node.text());
            if !text.is_empty() {
                found = Some(text);
                return Flow::Stop;
            }
        }
        Flow::Descend
    })?;
    Ok(found)
}
