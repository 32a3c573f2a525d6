use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Failed to parse structured content: {0}")]
    Syntax(String),

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
}

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error("Document content is not structured (content_type: {0})")]
    NotStructured(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Note backend error: {0}")]
    Backend(String),

    #[error("Note serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
