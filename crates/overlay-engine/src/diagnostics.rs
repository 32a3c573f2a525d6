//! Diagnostic sink for annotations that could not be rendered
//!
//! Skips are never errors: the pass carries on with the remaining
//! annotations and reports each skip to the sink the caller injected.

use shared_types::Annotation;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The annotation carries no position
    MissingPosition,
    /// `end <= start`
    EmptyRange { start: usize, end: usize },
    /// No leaf intersects the range; offsets and content disagree upstream
    NoIntersection { start: usize, end: usize },
    /// A leaf intersected but the relative highlight range was empty
    DegenerateIntersection { leaf_start: usize, leaf_end: usize },
    /// A resolved leaf path no longer addresses a text node
    StaleTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingPosition => write!(f, "annotation has no position"),
            SkipReason::EmptyRange { start, end } => {
                write!(f, "empty range {}..{}", start, end)
            }
            SkipReason::NoIntersection { start, end } => {
                write!(f, "no text node intersects {}..{}", start, end)
            }
            SkipReason::DegenerateIntersection {
                leaf_start,
                leaf_end,
            } => write!(
                f,
                "empty highlight within text node {}..{}",
                leaf_start, leaf_end
            ),
            SkipReason::StaleTarget => write!(f, "text node moved during splice"),
        }
    }
}

pub trait DiagnosticSink {
    fn on_skipped_annotation(&mut self, reason: &SkipReason, annotation: &Annotation);
}

/// Routes diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn on_skipped_annotation(&mut self, reason: &SkipReason, annotation: &Annotation) {
        match reason {
            SkipReason::DegenerateIntersection { .. } => tracing::debug!(
                clause_type = %annotation.clause_type,
                "Skipped intersection: {}",
                reason
            ),
            _ => tracing::warn!(
                clause_type = %annotation.clause_type,
                selected_text = %annotation.selected_text,
                "Skipped annotation: {}",
                reason
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedAnnotation {
    pub reason: SkipReason,
    pub annotation: Annotation,
}

/// Records every diagnostic, and also forwards it to `tracing`
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub skipped: Vec<SkippedAnnotation>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn reasons(&self) -> Vec<&SkipReason> {
        self.skipped.iter().map(|s| &s.reason).collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn on_skipped_annotation(&mut self, reason: &SkipReason, annotation: &Annotation) {
        TracingSink.on_skipped_annotation(reason, annotation);
        self.skipped.push(SkippedAnnotation {
            reason: reason.clone(),
            annotation: annotation.clone(),
        });
    }
}
