//! Page visibility over page-level container elements

use crate::error::OverlayError;
use crate::markup::{Fragment, Node};

pub const HIDDEN: &str = "hidden";

/// Number of page containers, counted without descending into a page
pub fn page_count(fragment: &Fragment, page_class: &str) -> usize {
    fn walk(nodes: &[Node], page_class: &str) -> usize {
        nodes
            .iter()
            .map(|node| match node {
                Node::Element(element) if element.has_class(page_class) => 1,
                Node::Element(element) => walk(&element.children, page_class),
                Node::Text(_) => 0,
            })
            .sum()
    }
    walk(&fragment.nodes, page_class)
}

/// Show page `page` (1-based) and hide every other page container.
///
/// Only the `hidden` attribute of page containers changes; their content is
/// left intact. Returns the page count. An out-of-range page hides all pages.
pub fn apply_page_visibility(fragment: &mut Fragment, page: usize, page_class: &str) -> usize {
    fn walk(nodes: &mut [Node], page: usize, page_class: &str, seen: &mut usize) {
        for node in nodes {
            let Node::Element(element) = node else {
                continue;
            };
            if element.has_class(page_class) {
                *seen += 1;
                if *seen == page {
                    element.remove_attr(HIDDEN);
                } else {
                    element.set_attr(HIDDEN, HIDDEN);
                }
            } else {
                walk(&mut element.children, page, page_class, seen);
            }
        }
    }

    let mut seen = 0;
    walk(&mut fragment.nodes, page, page_class, &mut seen);
    if seen > 0 && (page == 0 || page > seen) {
        tracing::warn!("Page {} out of range (document has {} pages)", page, seen);
    }
    seen
}

/// Count page containers in rendered markup
pub fn count_pages(markup: &str, page_class: &str) -> Result<usize, OverlayError> {
    let fragment = Fragment::parse(markup)?;
    Ok(page_count(&fragment, page_class))
}

/// Re-apply page visibility to already rendered markup without re-highlighting
pub fn show_page(markup: &str, page: usize, page_class: &str) -> Result<String, OverlayError> {
    let mut fragment = Fragment::parse(markup)?;
    apply_page_visibility(&mut fragment, page, page_class);
    Ok(fragment.to_markup())
}
