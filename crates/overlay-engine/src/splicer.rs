//! Highlight Splicer: rewrite one leaf into pre-text, highlight span, post-text
//!
//! The leaf's parent is rebuilt with the same name and attributes and swapped
//! in at its old position. Nothing inside the tree is edited in place, so a
//! parent that was already rebuilt by an earlier splice is just another
//! element to rebuild.

use shared_types::{Annotation, ClauseCatalog};
use std::mem;

use crate::config::OverlayConfig;
use crate::diagnostics::SkipReason;
use crate::markup::{Element, Fragment, Node};
use crate::resolver::Intersection;
use crate::style;

pub const ATTR_CLAUSE_TYPE: &str = "data-clause-type";
pub const ATTR_ANNOTATION_ID: &str = "data-annotation-id";
pub const ATTR_CONFIDENCE: &str = "data-confidence";

/// Everything a highlight span carries besides its text
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub clause_type: String,
    pub identifier: String,
    /// Detected annotations only
    pub confidence: Option<f64>,
    pub class: String,
    pub style: String,
    pub title: Option<String>,
}

impl Highlight {
    pub fn for_annotation(
        annotation: &Annotation,
        identifier: String,
        catalog: &ClauseCatalog,
        config: &OverlayConfig,
    ) -> Self {
        let user_authored = annotation.is_user();
        let color = style::highlight_color(annotation, catalog, config);
        let class = if user_authored {
            format!("{} {}", config.highlight_class, config.user_class)
        } else {
            config.highlight_class.clone()
        };

        Self {
            clause_type: annotation.clause_type.to_string(),
            identifier,
            confidence: (!user_authored).then(|| annotation.confidence()),
            class,
            style: style::highlight_style(color, user_authored, config),
            title: config
                .tooltips
                .then(|| style::tooltip(annotation, catalog)),
        }
    }

    pub fn span(&self, text: &str) -> Node {
        let mut span = Element::new("span")
            .with_attr("class", &self.class)
            .with_attr(ATTR_CLAUSE_TYPE, &self.clause_type)
            .with_attr(ATTR_ANNOTATION_ID, &self.identifier);
        if let Some(confidence) = self.confidence {
            span.set_attr(ATTR_CONFIDENCE, &confidence.to_string());
        }
        span.set_attr("style", &self.style);
        if let Some(title) = &self.title {
            span.set_attr("title", title);
        }
        Node::Element(span.with_child(Node::text(text)))
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Split `text` at character offsets into (before, highlighted, after).
///
/// Returns `None` when the highlighted part would be empty.
pub fn split_text(text: &str, rel_start: usize, rel_end: usize) -> Option<(&str, &str, &str)> {
    let len = text.chars().count();
    if rel_end <= rel_start || rel_start >= len {
        return None;
    }
    let start = byte_offset(text, rel_start);
    let end = byte_offset(text, rel_end.min(len));
    Some((&text[..start], &text[start..end], &text[end..]))
}

/// Splice one intersection into the fragment, returning the highlighted text
pub fn splice(
    fragment: &mut Fragment,
    intersection: &Intersection,
    highlight: &Highlight,
) -> Result<String, SkipReason> {
    let path = &intersection.leaf.path;
    let Some((&idx, parent_path)) = path.split_last() else {
        return Err(SkipReason::StaleTarget);
    };
    let Some(Node::Text(text)) = fragment.node_at(path) else {
        return Err(SkipReason::StaleTarget);
    };

    let (before, marked, after) = split_text(text, intersection.rel_start, intersection.rel_end)
        .ok_or(SkipReason::DegenerateIntersection {
            leaf_start: intersection.leaf.start,
            leaf_end: intersection.leaf.end,
        })?;

    let mut replacement = Vec::with_capacity(3);
    if !before.is_empty() {
        replacement.push(Node::text(before));
    }
    replacement.push(highlight.span(marked));
    if !after.is_empty() {
        replacement.push(Node::text(after));
    }
    let marked = marked.to_string();

    substitute(fragment, parent_path, idx, replacement)?;
    Ok(marked)
}

/// Swap the child at `idx` of the node at `parent_path` for `replacement`
fn substitute(
    fragment: &mut Fragment,
    parent_path: &[usize],
    idx: usize,
    replacement: Vec<Node>,
) -> Result<(), SkipReason> {
    if parent_path.is_empty() {
        let nodes = mem::take(&mut fragment.nodes);
        fragment.nodes = spliced_children(nodes, idx, replacement);
        return Ok(());
    }

    let slot = fragment
        .node_at_mut(parent_path)
        .ok_or(SkipReason::StaleTarget)?;
    let Node::Element(parent) = mem::replace(slot, Node::Text(String::new())) else {
        return Err(SkipReason::StaleTarget);
    };
    *slot = Node::Element(Element {
        name: parent.name,
        attributes: parent.attributes,
        children: spliced_children(parent.children, idx, replacement),
    });
    Ok(())
}

fn spliced_children(children: Vec<Node>, idx: usize, replacement: Vec<Node>) -> Vec<Node> {
    let mut rebuilt = Vec::with_capacity(children.len() + replacement.len());
    let mut replacement = Some(replacement);
    for (i, child) in children.into_iter().enumerate() {
        if i == idx {
            rebuilt.extend(replacement.take().into_iter().flatten());
        } else {
            rebuilt.push(child);
        }
    }
    rebuilt
}
