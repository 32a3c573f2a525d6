//! Interval Resolver: which leaves an annotation touches, and how

use shared_types::TextPosition;

use crate::offset_index::{Leaf, OffsetIndex};

/// How one annotation interval intersects one leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The whole annotation lies inside the leaf
    Contained,
    /// The leaf holds the annotation's opening portion
    LeftOverlap,
    /// The leaf holds the annotation's closing portion
    RightOverlap,
    /// The annotation starts before and ends after the leaf
    Spanned,
}

impl Overlap {
    pub fn classify(range: TextPosition, leaf_start: usize, leaf_end: usize) -> Option<Self> {
        let TextPosition { start, end } = range;
        if leaf_start <= start && end <= leaf_end {
            Some(Overlap::Contained)
        } else if leaf_start <= start && start < leaf_end && leaf_end <= end {
            Some(Overlap::LeftOverlap)
        } else if start <= leaf_start && leaf_start < end && end <= leaf_end {
            Some(Overlap::RightOverlap)
        } else if start < leaf_start && leaf_end < end {
            Some(Overlap::Spanned)
        } else {
            None
        }
    }
}

/// A leaf to splice, with the highlight bounds relative to the leaf text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    pub leaf: Leaf,
    pub overlap: Overlap,
    pub rel_start: usize,
    pub rel_end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Spliceable intersections in document order
    pub intersections: Vec<Intersection>,
    /// Leaves that intersected but produced an empty relative range
    pub degenerate: Vec<Leaf>,
}

impl Resolution {
    pub fn is_unmatched(&self) -> bool {
        self.intersections.is_empty() && self.degenerate.is_empty()
    }
}

/// Resolve one non-empty annotation range against the current leaves
pub fn resolve(range: TextPosition, index: &OffsetIndex) -> Resolution {
    let mut resolution = Resolution::default();

    for leaf in index.leaves() {
        let Some(overlap) = Overlap::classify(range, leaf.start, leaf.end) else {
            continue;
        };

        let len = leaf.len();
        let (rel_start, rel_end) = match overlap {
            Overlap::Contained => (range.start - leaf.start, range.end - leaf.start),
            Overlap::LeftOverlap => (range.start - leaf.start, len),
            Overlap::RightOverlap => (0, range.end - leaf.start),
            Overlap::Spanned => (0, len),
        };

        if rel_end <= rel_start || rel_start >= len {
            resolution.degenerate.push(leaf.clone());
            continue;
        }

        resolution.intersections.push(Intersection {
            leaf: leaf.clone(),
            overlap,
            rel_start,
            rel_end,
        });

        if overlap == Overlap::Contained {
            break;
        }
    }

    resolution
}
