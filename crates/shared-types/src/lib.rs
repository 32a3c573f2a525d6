pub mod notes;
pub mod types;

pub use notes::{Note, NoteKey};
pub use types::{
    to_hyphenated, to_underscored, Annotation, AnnotationSource, ClauseCatalog, ClauseDetection,
    ClauseInfo, ClauseType, StructuredDocument, TextPosition, STRUCTURED_CONTENT, USER_CONFIDENCE,
    USER_REASON,
};
