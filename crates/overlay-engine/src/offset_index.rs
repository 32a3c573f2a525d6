//! Offset Index: text-bearing leaves and their absolute character ranges

use crate::markup::{Element, Fragment, Node};

pub const DATA_START: &str = "data-start";
pub const DATA_END: &str = "data-end";

/// One addressable text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Child-index path from the fragment root to the text node
    pub path: Vec<usize>,
    pub start: usize,
    pub end: usize,
}

impl Leaf {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Text leaves of a fragment in document order.
///
/// A text node's range starts at its nearest offset-bearing ancestor's
/// `data-start` plus the characters of text preceding it inside that
/// ancestor, so leaves created by earlier splices are addressed exactly
/// like the original ones.
#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
    leaves: Vec<Leaf>,
}

impl OffsetIndex {
    pub fn build(fragment: &Fragment) -> Self {
        let mut leaves = Vec::new();
        let mut path = Vec::new();
        walk(&fragment.nodes, None, &mut path, &mut leaves);
        tracing::debug!("Offset index built with {} leaves", leaves.len());
        Self { leaves }
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// Parse `data-start`/`data-end`; malformed or inverted ranges are not addressable
pub fn element_range(element: &Element) -> Option<(usize, usize)> {
    let start = element.attr(DATA_START)?.trim().parse::<usize>().ok()?;
    let end = element.attr(DATA_END)?.trim().parse::<usize>().ok()?;
    (start <= end).then_some((start, end))
}

/// Returns the number of characters of text under `nodes`
fn walk(
    nodes: &[Node],
    cursor: Option<usize>,
    path: &mut Vec<usize>,
    out: &mut Vec<Leaf>,
) -> usize {
    let mut consumed = 0;
    for (idx, node) in nodes.iter().enumerate() {
        path.push(idx);
        let offset = cursor.and_then(|c| c.checked_add(consumed));
        consumed += match node {
            Node::Text(text) => {
                let len = text.chars().count();
                if let Some(start) = offset.filter(|_| len > 0) {
                    if let Some(end) = start.checked_add(len) {
                        out.push(Leaf {
                            path: path.clone(),
                            start,
                            end,
                        });
                    }
                }
                len
            }
            Node::Element(element) => {
                let own = element_range(element);
                let child_cursor = own.map(|(start, _)| start).or(offset);
                let mut inner = Vec::new();
                let len = walk(&element.children, child_cursor, path, &mut inner);
                match child_cursor {
                    // Text past usize::MAX cannot be addressed
                    Some(start) if start.checked_add(len).is_none() => {
                        tracing::debug!(
                            "<{}> text starting at {} overflows the offset range",
                            element.name,
                            start
                        );
                    }
                    _ => out.append(&mut inner),
                }
                if let Some((start, end)) = own {
                    if end - start != len {
                        tracing::debug!(
                            "<{}> declares range {}..{} but holds {} characters",
                            element.name,
                            start,
                            end,
                            len
                        );
                    }
                }
                len
            }
        };
        path.pop();
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(markup: &str) -> Vec<(usize, usize)> {
        let fragment = Fragment::parse(markup).unwrap();
        OffsetIndex::build(&fragment)
            .leaves()
            .iter()
            .map(|leaf| (leaf.start, leaf.end))
            .collect()
    }

    #[test]
    fn test_leaves_follow_document_order() {
        let markup = concat!(
            r#"<div class="page"><p data-start="0" data-end="5">Hello</p>"#,
            r#"<p data-start="5" data-end="11"> world</p></div>"#,
        );
        assert_eq!(ranges(markup), vec![(0, 5), (5, 11)]);
    }

    #[test]
    fn test_paths_address_text_nodes() {
        let markup = r#"<div><p data-start="0" data-end="3">abc</p></div>"#;
        let fragment = Fragment::parse(markup).unwrap();
        let index = OffsetIndex::build(&fragment);
        assert_eq!(index.leaves()[0].path, vec![0, 0, 0]);
        assert_eq!(fragment.node_at(&index.leaves()[0].path), Some(&Node::text("abc")));
    }

    #[test]
    fn test_text_outside_offset_elements_is_unaddressable() {
        let markup = r#"<div>Heading<p data-start="0" data-end="4">Body</p></div>"#;
        assert_eq!(ranges(markup), vec![(0, 4)]);
    }

    #[test]
    fn test_malformed_offsets_are_excluded() {
        let markup = concat!(
            r#"<p data-start="x" data-end="4">Body</p>"#,
            r#"<p data-start="9" data-end="4">Tail</p>"#,
            r#"<p data-start="4">Open</p>"#,
        );
        assert!(ranges(markup).is_empty());
    }

    #[test]
    fn test_offsets_near_usize_max_are_excluded() {
        let near_max = usize::MAX - 2;
        let markup = format!(
            r#"<p data-start="{}" data-end="{}">abcdef</p><p data-start="0" data-end="2">ok</p>"#,
            near_max,
            usize::MAX
        );
        assert_eq!(ranges(&markup), vec![(0, 2)]);
    }

    #[test]
    fn test_offsets_ending_at_usize_max_are_kept() {
        let start = usize::MAX - 3;
        let markup = format!(
            r#"<p data-start="{}" data-end="{}">ab<b>c</b></p>"#,
            start,
            usize::MAX
        );
        assert_eq!(
            ranges(&markup),
            vec![(start, start + 2), (start + 2, start + 3)]
        );
    }

    #[test]
    fn test_inline_children_accumulate_offsets() {
        let markup = r#"<p data-start="10" data-end="25">The <b>Tenant</b> pays</p>"#;
        assert_eq!(ranges(markup), vec![(10, 14), (14, 20), (20, 25)]);
    }

    #[test]
    fn test_nested_offset_element_overrides_cursor() {
        let markup =
            r#"<section data-start="0" data-end="8">ab<p data-start="2" data-end="5">cde</p>fgh</section>"#;
        assert_eq!(ranges(markup), vec![(0, 2), (2, 5), (5, 8)]);
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let markup =
            r#"<p data-start="0" data-end="3">§ 4</p><p data-start="3" data-end="5">ok</p>"#;
        assert_eq!(ranges(markup), vec![(0, 3), (3, 5)]);
    }

    #[test]
    fn test_empty_document_yields_empty_index() {
        let index = OffsetIndex::build(&Fragment::default());
        assert!(index.is_empty());
    }
}
