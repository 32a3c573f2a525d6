//! Review session: the inputs of successive overlay passes for one document
//!
//! Every input change bumps the session generation. A pass started from an
//! older generation is superseded and its output must be discarded, so the
//! latest inputs always win. Filter and annotation changes also invalidate the
//! cached highlighted markup; page changes only re-apply visibility to it.

use shared_types::{Annotation, ClauseType, NoteKey, StructuredDocument};

use crate::annotation_set::AnnotationSet;
use crate::error::OverlayError;
use crate::filter::ActiveFilter;
use crate::notes;
use crate::overlay::OverlayEngine;
use crate::pagination;
use crate::selection::{user_annotation, SelectionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTicket {
    generation: u64,
}

/// Snapshot of the inputs for one pass
#[derive(Debug, Clone)]
pub struct PassInputs {
    pub ticket: PassTicket,
    pub content: String,
    pub annotations: AnnotationSet,
    pub filter: ActiveFilter,
    pub page: usize,
}

impl PassInputs {
    pub fn run(&self, engine: &OverlayEngine) -> Result<String, OverlayError> {
        engine.render_overlay(&self.content, &self.annotations, &self.filter, Some(self.page))
    }
}

#[derive(Debug, Clone)]
struct CachedOverlay {
    highlight_generation: u64,
    markup: String,
    page_count: usize,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    document: StructuredDocument,
    annotations: AnnotationSet,
    filter: ActiveFilter,
    page: usize,
    generation: u64,
    highlight_generation: u64,
    cached: Option<CachedOverlay>,
}

impl ReviewSession {
    /// Start on page 1 with the given filter
    pub fn new(document: StructuredDocument, filter: ActiveFilter) -> Self {
        let annotations = AnnotationSet::from_document(&document);
        Self {
            document,
            annotations,
            filter,
            page: 1,
            generation: 0,
            highlight_generation: 0,
            cached: None,
        }
    }

    pub fn document(&self) -> &StructuredDocument {
        &self.document
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn filter(&self) -> &ActiveFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Page count of the last rendered overlay
    pub fn page_count(&self) -> Option<usize> {
        self.cached.as_ref().map(|cached| cached.page_count)
    }

    fn touch_highlights(&mut self) {
        self.generation += 1;
        self.highlight_generation += 1;
    }

    pub fn set_filter(&mut self, filter: ActiveFilter) {
        self.filter = filter;
        self.touch_highlights();
    }

    /// Flip one clause type; returns whether it is now enabled
    pub fn toggle_type(&mut self, clause_type: impl Into<ClauseType>) -> bool {
        let enabled = self.filter.toggle(clause_type);
        self.touch_highlights();
        enabled
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.generation += 1;
    }

    pub fn add_user_annotation(
        &mut self,
        selection: &SelectionEvent,
        clause_type: impl Into<ClauseType>,
        comment: &str,
    ) -> Result<&Annotation, OverlayError> {
        let annotation = user_annotation(selection, clause_type, comment)?;
        self.touch_highlights();
        Ok(self.annotations.push_user(annotation))
    }

    pub fn begin_pass(&self) -> PassInputs {
        PassInputs {
            ticket: PassTicket {
                generation: self.generation,
            },
            content: self.document.content.clone(),
            annotations: self.annotations.clone(),
            filter: self.filter.clone(),
            page: self.page,
        }
    }

    pub fn is_current(&self, ticket: PassTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Keep a pass result only if no newer input superseded its pass
    pub fn accept<T>(&self, ticket: PassTicket, output: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(output)
        } else {
            tracing::debug!(
                "Discarding result of superseded pass (generation {} < {})",
                ticket.generation,
                self.generation
            );
            None
        }
    }

    /// Render the current page, re-running highlighting only when needed
    pub fn render(&mut self, engine: &OverlayEngine) -> Result<String, OverlayError> {
        if !self.document.is_structured() {
            return Err(OverlayError::NotStructured(
                self.document.content_type.clone(),
            ));
        }

        let page_class = &engine.config().page_class;
        let cached = match self.cached.take() {
            Some(cached) if cached.highlight_generation == self.highlight_generation => cached,
            _ => {
                let markup = engine.render_overlay(
                    &self.document.content,
                    &self.annotations,
                    &self.filter,
                    None,
                )?;
                let page_count = pagination::count_pages(&markup, page_class)?;
                CachedOverlay {
                    highlight_generation: self.highlight_generation,
                    markup,
                    page_count,
                }
            }
        };

        let shown = pagination::show_page(&cached.markup, self.page, page_class);
        self.cached = Some(cached);
        shown
    }

    /// Render, falling back to the raw content when overlaying fails
    pub fn render_or_raw(&mut self, engine: &OverlayEngine) -> String {
        match self.render(engine) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Showing unhighlighted content: {}", e);
                self.document.content.clone()
            }
        }
    }

    pub fn resolve_click(
        &self,
        engine: &OverlayEngine,
        clicked_type: &str,
        clicked_identifier: &str,
    ) -> Option<&Annotation> {
        engine.resolve_click(clicked_type, clicked_identifier, &self.annotations)
    }

    /// Identifier `engine` embeds for `annotation`, matching what [`Self::resolve_click`] accepts
    pub fn annotation_identifier(
        &self,
        engine: &OverlayEngine,
        annotation: &Annotation,
    ) -> Option<String> {
        engine.identifier(annotation)
    }

    /// Key of the note attached to `annotation` within this document
    pub fn note_key(&self, annotation: &Annotation) -> Option<NoteKey> {
        notes::note_key(&self.document.id, annotation)
    }
}
