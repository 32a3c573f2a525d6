pub mod annotation_set;
pub mod click;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod identity;
pub mod markup;
pub mod notes;
pub mod offset_index;
pub mod overlay;
pub mod pagination;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod splicer;
pub mod style;

pub use annotation_set::AnnotationSet;
pub use click::{resolve_click, resolve_click_with, ClickTarget};
pub use config::OverlayConfig;
pub use diagnostics::{CollectingSink, DiagnosticSink, SkipReason, TracingSink};
pub use error::{MarkupError, NoteError, OverlayError};
pub use filter::ActiveFilter;
pub use identity::{annotation_identifier, identifier_for, IdentifierScheme};
pub use markup::{Element, Fragment, Node};
pub use notes::{note_key, MemoryNoteStore, NoteStore};
pub use overlay::{OverlayEngine, OverlayResult, RenderedHighlight};
pub use pagination::{count_pages, show_page};
pub use selection::{user_annotation, SelectionEvent};
pub use session::{PassInputs, PassTicket, ReviewSession};
pub use shared_types::{to_hyphenated, to_underscored};
