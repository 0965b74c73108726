//! Read-only adapter over the `dom_query` tree.
//!
//! Everything in this crate reaches the upstream tree through this module:
//! node kind classification, attribute and tag helpers, and [`walk`], the
//! iterative depth-first traversal that keeps the guard's depth counter
//! authoritative. The tree is never mutated.

pub use dom_query::{Document, NodeRef, Selection};
pub use tendril::StrTendril;

use crate::error::{Error, Result};
use crate::guard::Guard;
use crate::tags::{self, TagClass};

/// Node kinds as seen by the extraction core.
///
/// Comments, doctypes and processing instructions are `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Other,
}

#[must_use]
pub fn node_kind(node: &NodeRef) -> NodeKind {
    if node.is_element() {
        NodeKind::Element
    } else if node.is_text() {
        NodeKind::Text
    } else if node.is_document() {
        NodeKind::Document
    } else {
        NodeKind::Other
    }
}

/// Lowercase tag name of an element.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Tag classification of an element; non-elements are `Inline`.
#[must_use]
pub fn tag_class(node: &NodeRef) -> TagClass {
    let name: Option<StrTendril> = node.node_name();
    name.map_or(TagClass::Inline, |t| tags::classify(&t))
}

/// Attribute value, if present.
#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    Selection::from(*node).attr(name).map(|s| s.to_string())
}

/// Attribute value, treating empty or whitespace-only values as absent.
#[must_use]
pub fn non_empty_attr(node: &NodeRef, name: &str) -> Option<String> {
    attr(node, name).filter(|v| !v.trim().is_empty())
}

/// Parse HTML into a tree.
///
/// `dom_query` always builds a document; a tree without a single element
/// means the builder gave up.
pub fn parse(html: &str) -> Result<Document> {
    let document = Document::from(html);
    let has_element = document.root().first_child().is_some_and(|first| {
        let mut node = Some(first);
        while let Some(n) = node {
            if n.is_element() {
                return true;
            }
            node = n.next_sibling();
        }
        false
    });
    if !has_element {
        return Err(Error::ParseError("tree builder produced no elements".to_string()));
    }
    Ok(document)
}

/// First `body` element of the document.
#[must_use]
pub fn find_body(document: &Document) -> Option<NodeRef<'_>> {
    document.select_single("body").nodes().first().copied()
}

/// Step delivered to a [`walk`] visitor.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// An element (or the document node) is entered, at the given depth.
    Open(NodeRef<'a>, usize),
    /// A previously opened element whose children were visited is left.
    Close(NodeRef<'a>),
    /// A text node.
    Text(NodeRef<'a>),
}

/// Visitor decision after an `Open` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Visit the children, then deliver `Close`.
    Descend,
    /// Skip the subtree; no `Close` follows.
    Skip,
    /// End the walk.
    Stop,
}

/// Iterative pre-order walk of the subtree at `root`.
///
/// Every step consults `guard.check()`, every descent `guard.descend()`.
/// The guard counts depth from the document node, so a walk rooted at
/// `body` starts at 2. `Open` events carry the depth relative to `root`.
/// The visitor's return value is only consulted for `Open` events. The
/// guard depth is back at zero when the walk returns.
pub fn walk<'a, F>(root: NodeRef<'a>, guard: &mut Guard, mut visit: F) -> Result<()>
where
    F: FnMut(Event<'a>) -> Flow,
{
    let result = guard
        .enter_at(absolute_depth(&root))
        .and_then(|()| walk_inner(root, guard, &mut visit));
    guard.reset_depth();
    result
}

/// Number of ancestors above `node`.
fn absolute_depth(node: &NodeRef) -> usize {
    let mut depth = 0;
    let mut parent = node.parent();
    while let Some(p) = parent {
        depth += 1;
        parent = p.parent();
    }
    depth
}

fn walk_inner<'a, F>(root: NodeRef<'a>, guard: &mut Guard, visit: &mut F) -> Result<()>
where
    F: FnMut(Event<'a>) -> Flow,
{
    // Open ancestors of `current`, root at the bottom.
    let mut stack: Vec<NodeRef<'a>> = Vec::new();
    let mut current = Some(root);

    while let Some(node) = current {
        guard.check()?;

        match node_kind(&node) {
            NodeKind::Element | NodeKind::Document => match visit(Event::Open(node, stack.len())) {
                Flow::Stop => break,
                Flow::Skip => {}
                Flow::Descend => {
                    if let Some(child) = node.first_child() {
                        guard.descend()?;
                        stack.push(node);
                        current = Some(child);
                        continue;
                    }
                    visit(Event::Close(node));
                }
            },
            NodeKind::Text => {
                if visit(Event::Text(node)) == Flow::Stop {
                    break;
                }
            }
            NodeKind::Other => {}
        }

        current = advance(node, &mut stack, guard, visit);
    }

    while stack.pop().is_some() {
        guard.ascend();
    }
    Ok(())
}

/// Next node in pre-order after the subtree of `node`, closing finished ancestors.
fn advance<'a, F>(mut node: NodeRef<'a>, stack: &mut Vec<NodeRef<'a>>, guard: &mut Guard, visit: &mut F) -> Option<NodeRef<'a>>
where
    F: FnMut(Event<'a>) -> Flow,
{
    loop {
        if stack.is_empty() {
            // `node` is the walk root; its siblings are out of scope.
            return None;
        }
        if let Some(sibling) = node.next_sibling() {
            return Some(sibling);
        }
        let parent = stack.pop()?;
        guard.ascend();
        visit(Event::Close(parent));
        node = parent;
    }
}

/// Collapse whitespace runs to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
