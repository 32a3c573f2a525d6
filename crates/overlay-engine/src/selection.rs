use serde::{Deserialize, Serialize};
use shared_types::{Annotation, ClauseType, TextPosition};

use crate::error::OverlayError;

/// A text selection already resolved to absolute offsets by the rendering surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl SelectionEvent {
    pub fn new(text: &str, start: usize, end: usize) -> Self {
        Self {
            text: text.to_string(),
            start,
            end,
        }
    }
}

/// Build a user-authored annotation from a resolved selection
pub fn user_annotation(
    selection: &SelectionEvent,
    clause_type: impl Into<ClauseType>,
    comment: &str,
) -> Result<Annotation, OverlayError> {
    if selection.text.trim().is_empty() {
        return Err(OverlayError::InvalidSelection(
            "selection is empty".to_string(),
        ));
    }
    if selection.end <= selection.start {
        return Err(OverlayError::InvalidSelection(format!(
            "end {} is not after start {}",
            selection.end, selection.start
        )));
    }
    let expected = selection.end - selection.start;
    let actual = selection.text.chars().count();
    if expected != actual {
        tracing::debug!(
            "Selection covers {} characters but text has {}",
            expected,
            actual
        );
    }

    Ok(Annotation::user(
        clause_type,
        &selection.text,
        TextPosition::new(selection.start, selection.end),
        comment,
    ))
}
