//! Readability scorer.
//!
//! Picks the element most likely to hold the page's primary content. One
//! guarded walk over the document computes, for each candidate element, the
//! density of its directly-owned text, a semantic bonus or penalty, and the
//! decayed scores propagated up from its descendants.

use crate::dom::{self, Document, Event, Flow, NodeRef};
use crate::error::Result;
use crate::guard::Guard;
use crate::patterns::NEGATIVE_KEYWORDS;
use crate::tags::TagClass;

/// Owned text shorter than this does not score on its own.
pub const MIN_CANDIDATE_TEXT: usize = 25;

/// Bonus for `article`, `section` and `main`.
pub const SEMANTIC_BONUS: f64 = 100.0;

/// Penalty for elements inside boilerplate regions.
pub const NEGATIVE_BONUS: f64 = -100.0;

/// Share of a child's score that reaches its parent.
pub const DECAY: f64 = 0.5;

/// A scored element. Only lives while the winner is chosen.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub node: NodeRef<'a>,
    pub score: f64,
    pub text_length: usize,
    pub link_text_length: usize,
    pub density: f64,
    pub depth: usize,
    pub order: usize,
}

impl ScoredCandidate<'_> {
    /// Higher score first, then shallower, then earlier in the document.
    fn beats(&self, other: &Self) -> bool {
        if self.score != other.score {
            return self.score > other.score;
        }
        if self.depth != other.depth {
            return self.depth < other.depth;
        }
        self.order < other.order
    }
}

/// Per-element accumulator while the element is open.
struct Frame<'a> {
    node: NodeRef<'a>,
    class: TagClass,
    depth: usize,
    order: usize,
    /// This element itself matches the keyword list.
    matches_negative: bool,
    /// This element or an ancestor matches the keyword list.
    negative: bool,
    text_length: usize,
    link_text_length: usize,
    child_score: f64,
    has_scoring_descendant: bool,
}

impl<'a> Frame<'a> {
    fn new(node: NodeRef<'a>, class: TagClass, depth: usize, order: usize, matches_negative: bool, negative: bool) -> Self {
        Self {
            node,
            class,
            depth,
            order,
            matches_negative,
            negative,
            text_length: 0,
            link_text_length: 0,
            child_score: 0.0,
            has_scoring_descendant: false,
        }
    }
}

/// Outcome of scoring a document.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// The chosen content root.
    pub root: NodeRef<'a>,
    /// The winning candidate, or `None` when the fallback was used.
    pub winner: Option<ScoredCandidate<'a>>,
    /// Number of elements that qualified as candidates.
    pub candidates: usize,
}

/// Choose the primary content root of `document`.
///
/// Falls back to `body`, then to the document node, when no element
/// qualifies.
pub fn find_content_root<'a>(document: &'a Document, guard: &mut Guard, sanitize: bool) -> Result<Selection<'a>> {
    let (winner, candidates) = score_tree(document.root(), guard, sanitize)?;

    if let Some(best) = winner {
        tracing::debug!(
            tag = dom::tag_name(&best.node).as_deref().unwrap_or("?"),
            score = best.score,
            depth = best.depth,
            density = best.density,
            candidates,
            "content root selected"
        );
        return Ok(Selection { root: best.node, winner: Some(best), candidates });
    }

    let root = dom::find_body(document).unwrap_or_else(|| document.root());
    tracing::debug!(candidates, "no content candidate; falling back to document body");
    Ok(Selection { root, winner: None, candidates })
}

/// Score every candidate under `root`; returns the winner and the candidate count.
pub fn score_tree<'a>(root: NodeRef<'a>, guard: &mut Guard, sanitize: bool) -> Result<(Option<ScoredCandidate<'a>>, usize)> {
    let mut frames: Vec<Frame<'a>> = Vec::new();
    let mut best: Option<ScoredCandidate<'a>> = None;
    let mut candidates = 0usize;
    let mut order = 0usize;
    // Open `a` elements; text inside them is link text.
    let mut link_depth = 0usize;
    // Open elements matching the negative keyword list.
    let mut negative_depth = 0usize;

    dom::walk(root, guard, |event| {
        match event {
            Event::Open(node, depth) => {
                if !node.is_element() {
                    return Flow::Descend;
                }
                let class = dom::tag_class(&node);
                if class == TagClass::Metadata || (sanitize && class.is_sanitized()) {
                    return Flow::Skip;
                }
                if class == TagClass::Link {
                    link_depth += 1;
                }
                let matches_negative = is_negative(&node);
                if matches_negative {
                    negative_depth += 1;
                }
                order += 1;
                frames.push(Frame::new(node, class, depth, order, matches_negative, negative_depth > 0));
            }
            Event::Text(node) => {
                if let Some(frame) = frames.last_mut() {
                    let len = text_length(&node.text());
                    frame.text_length += len;
                    if link_depth > 0 {
                        frame.link_text_length += len;
                    }
                }
            }
            Event::Close(node) => {
                if !node.is_element() {
                    return Flow::Descend;
                }
                let Some(frame) = frames.pop() else {
                    return Flow::Descend;
                };
                if frame.class == TagClass::Link {
                    link_depth = link_depth.saturating_sub(1);
                }
                if frame.matches_negative {
                    negative_depth = negative_depth.saturating_sub(1);
                }
                if let Some(candidate) = close_frame(&frame, frames.last_mut()) {
                    candidates += 1;
                    tracing::trace!(
                        tag = dom::tag_name(&candidate.node).as_deref().unwrap_or("?"),
                        score = candidate.score,
                        text_length = candidate.text_length,
                        link_text_length = candidate.link_text_length,
                        "candidate scored"
                    );
                    if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                        best = Some(candidate);
                    }
                }
            }
        }
        Flow::Descend
    })?;

    Ok((best, candidates))
}

/// Finish an element: score it if it qualifies and hand its text and score
/// to the parent frame.
fn close_frame<'a>(frame: &Frame<'a>, parent: Option<&mut Frame<'a>>) -> Option<ScoredCandidate<'a>> {
    let own_eligible = frame.class.is_candidate() && frame.text_length >= MIN_CANDIDATE_TEXT;
    let container_eligible = frame.class.is_candidate() && frame.has_scoring_descendant;
    let is_candidate = own_eligible || container_eligible;

    let density = frame.text_length as f64 / (1.0 + frame.link_text_length as f64);
    let mut score = frame.child_score;
    if own_eligible {
        score += density;
    }
    if is_candidate {
        score += semantic_bonus(frame);
    }

    if let Some(parent) = parent {
        if !own_eligible && !frame.negative {
            // Short or non-candidate text counts toward the enclosing element.
            parent.text_length += frame.text_length;
            parent.link_text_length += frame.link_text_length;
        }
        if is_candidate || frame.has_scoring_descendant {
            parent.child_score += score * DECAY;
            parent.has_scoring_descendant = true;
        }
    }

    is_candidate.then(|| ScoredCandidate {
        node: frame.node,
        score,
        text_length: frame.text_length,
        link_text_length: frame.link_text_length,
        density,
        depth: frame.depth,
        order: frame.order,
    })
}

fn semantic_bonus(frame: &Frame<'_>) -> f64 {
    let mut bonus = 0.0;
    if frame.class == TagClass::SemanticCandidate {
        bonus += SEMANTIC_BONUS;
    }
    if frame.negative {
        bonus += NEGATIVE_BONUS;
    }
    bonus
}

/// Tag name, id or class matches the boilerplate keyword list.
fn is_negative(node: &NodeRef<'_>) -> bool {
    if node.node_name().is_some_and(|tag| NEGATIVE_KEYWORDS.is_match(&tag)) {
        return true;
    }
    ["id", "class"]
        .iter()
        .filter_map(|name| dom::attr(node, name))
        .any(|value| NEGATIVE_KEYWORDS.is_match(&value))
}

/// Characters of text with whitespace runs counted once.
fn text_length(text: &str) -> usize {
    let mut len = 0;
    let mut in_space = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                len += 1;
                in_space = true;
            }
        } else {
            len += 1;
            in_space = false;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pick(html: &str) -> (Option<String>, Option<String>) {
        let doc = Document::from(html);
        let mut guard = Guard::new(256, Duration::from_secs(5));
        let selection = find_content_root(&doc, &mut guard, true).unwrap();
        (dom::tag_name(&selection.root), dom::attr(&selection.root, "id"))
    }

    const PARAGRAPH: &str = "This paragraph carries enough words to count as real content.";

    #[test]
    fn test_article_wins_over_navigation() {
        let html = "<html><nav>Nav</nav><article><h1>Hello World</h1><p>Content here and more content to exceed the minimum length threshold.</p></article><footer>Footer</footer></html>";
        assert_eq!(pick(html).0.as_deref(), Some("article"));
    }

    #[test]
    fn test_run_of_paragraphs_beats_single_paragraph() {
        let html = format!(
            r#"<html><body><div id="single"><p>{PARAGRAPH}</p></div><div id="run"><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p></div></body></html>"#
        );
        assert_eq!(pick(&html).1.as_deref(), Some("run"));
    }

    #[test]
    fn test_sidebar_is_penalised() {
        let html = format!(
            r#"<html><body><div class="sidebar" id="side"><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p></div><div id="main"><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p></div></body></html>"#
        );
        assert_eq!(pick(&html).1.as_deref(), Some("main"));
    }

    #[test]
    fn test_link_heavy_block_scores_low() {
        let links = "<a href=\"/a\">first link text here</a> <a href=\"/b\">second link text here</a> <a href=\"/c\">third link text</a>";
        let html = format!(r#"<html><body><div id="links">{links}</div><div id="text">{PARAGRAPH}</div></body></html>"#);
        assert_eq!(pick(&html).1.as_deref(), Some("text"));
    }

    #[test]
    fn test_ties_break_by_document_order() {
        let html = format!(r#"<html><body><p id="first">{PARAGRAPH}</p><p id="second">{PARAGRAPH}</p></body></html>"#);
        assert_eq!(pick(&html).1.as_deref(), Some("first"));
    }

    #[test]
    fn test_ties_break_by_depth() {
        // Two equal paragraphs give the div exactly one paragraph's score.
        let html = format!(r#"<html><body><div id="outer"><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p></div></body></html>"#);
        assert_eq!(pick(&html).1.as_deref(), Some("outer"));
    }

    #[test]
    fn test_short_text_falls_back_to_body() {
        assert_eq!(pick("<html><body><p>tiny</p><div>also tiny</div></body></html>").0.as_deref(), Some("body"));
        assert_eq!(pick("<html></html>").0.as_deref(), Some("body"));
    }

    #[test]
    fn test_short_children_fold_into_parent() {
        let html = r#"<html><body><div id="wrap"><p>short one here</p><p>short two here</p><p>short three</p></div></body></html>"#;
        assert_eq!(pick(html).1.as_deref(), Some("wrap"));
    }

    #[test]
    fn test_scripts_do_not_count() {
        let script = "x".repeat(400);
        let html = format!(r#"<html><body><div id="script"><script>{script}</script></div><div id="text">{PARAGRAPH}</div></body></html>"#);
        assert_eq!(pick(&html).1.as_deref(), Some("text"));
    }

    #[test]
    fn test_text_length_collapses_whitespace() {
        assert_eq!(text_length("  a   b  "), 3);
        assert_eq!(text_length("abc"), 3);
        assert_eq!(text_length(""), 0);
    }

    #[test]
    fn test_density_penalises_links() {
        let doc = Document::from(format!("<html><body><p>{PARAGRAPH} <a href=\"/x\">some linked words</a></p></body></html>").as_str());
        let mut guard = Guard::new(64, Duration::from_secs(5));
        let (winner, count) = score_tree(doc.root(), &mut guard, true).unwrap();
        let winner = winner.unwrap();
        assert_eq!(count, 1);
        assert!(winner.link_text_length > 0);
        assert!(winner.density < winner.text_length as f64);
    }
}
