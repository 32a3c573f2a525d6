//! Overlay Orchestrator: one full highlight pass over structured content
//!
//! Every pass parses the original content afresh, processes the active
//! annotations in ascending start order, and re-serializes. The Offset Index
//! is rebuilt before each annotation so it always reflects the splices made
//! for the annotations before it.

use serde::Serialize;
use shared_types::{Annotation, ClauseCatalog, StructuredDocument};

use crate::annotation_set::AnnotationSet;
use crate::click::resolve_click_with;
use crate::config::OverlayConfig;
use crate::diagnostics::{DiagnosticSink, SkipReason, TracingSink};
use crate::error::OverlayError;
use crate::filter::ActiveFilter;
use crate::identity::identifier_for;
use crate::markup::Fragment;
use crate::offset_index::OffsetIndex;
use crate::pagination;
use crate::resolver::resolve;
use crate::splicer::{splice, Highlight};

/// One emitted highlight span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedHighlight {
    pub clause_type: String,
    pub identifier: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayResult {
    pub markup: String,
    /// Spans in processing order; one annotation may emit several
    pub highlights: Vec<RenderedHighlight>,
    pub page_count: usize,
    /// Diagnostics reported during the pass
    pub skipped: usize,
}

/// Renders annotation overlays against one clause catalog
#[derive(Debug, Clone)]
pub struct OverlayEngine {
    catalog: ClauseCatalog,
    config: OverlayConfig,
}

impl OverlayEngine {
    pub fn new(catalog: ClauseCatalog) -> Self {
        Self::with_config(catalog, OverlayConfig::default())
    }

    pub fn with_config(catalog: ClauseCatalog, config: OverlayConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &ClauseCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Identifier embedded in highlight spans under the configured scheme
    pub fn identifier(&self, annotation: &Annotation) -> Option<String> {
        identifier_for(self.config.identifier_scheme, annotation)
    }

    /// Render highlighted markup, reporting skipped annotations through `tracing`
    pub fn render_overlay(
        &self,
        content: &str,
        annotations: &AnnotationSet,
        filter: &ActiveFilter,
        page: Option<usize>,
    ) -> Result<String, OverlayError> {
        self.render_with_sink(content, annotations, filter, page, &mut TracingSink)
            .map(|result| result.markup)
    }

    /// Render a structured document with its detected clauses plus user annotations
    pub fn render_document(
        &self,
        document: &StructuredDocument,
        user_annotations: &[Annotation],
        filter: &ActiveFilter,
        page: Option<usize>,
    ) -> Result<String, OverlayError> {
        if !document.is_structured() {
            return Err(OverlayError::NotStructured(document.content_type.clone()));
        }
        let annotations =
            AnnotationSet::new(document.detected_annotations(), user_annotations.to_vec());
        self.render_overlay(&document.content, &annotations, filter, page)
    }

    /// Like [`render_document`](Self::render_document), falling back to the raw
    /// content when the document cannot be overlaid
    pub fn render_or_raw(
        &self,
        document: &StructuredDocument,
        user_annotations: &[Annotation],
        filter: &ActiveFilter,
        page: Option<usize>,
    ) -> String {
        match self.render_document(document, user_annotations, filter, page) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Showing unhighlighted content: {}", e);
                document.content.clone()
            }
        }
    }

    pub fn render_with_sink(
        &self,
        content: &str,
        annotations: &AnnotationSet,
        filter: &ActiveFilter,
        page: Option<usize>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<OverlayResult, OverlayError> {
        let mut fragment = Fragment::parse(content)?;
        let mut highlights = Vec::new();
        let mut skipped = 0;
        let mut report = |reason: SkipReason, annotation: &Annotation| {
            skipped += 1;
            sink.on_skipped_annotation(&reason, annotation);
        };

        let mut active = Vec::new();
        for annotation in filter.apply(annotations) {
            match annotation.position {
                Some(position) => active.push((position, annotation)),
                None => report(SkipReason::MissingPosition, annotation),
            }
        }
        active.sort_by_key(|(position, _)| position.start);

        for (position, annotation) in active {
            if position.is_empty() {
                report(
                    SkipReason::EmptyRange {
                        start: position.start,
                        end: position.end,
                    },
                    annotation,
                );
                continue;
            }
            let Some(identifier) = self.identifier(annotation) else {
                continue;
            };

            let resolution = resolve(position, &OffsetIndex::build(&fragment));
            if resolution.is_unmatched() {
                report(
                    SkipReason::NoIntersection {
                        start: position.start,
                        end: position.end,
                    },
                    annotation,
                );
                continue;
            }
            for leaf in &resolution.degenerate {
                report(
                    SkipReason::DegenerateIntersection {
                        leaf_start: leaf.start,
                        leaf_end: leaf.end,
                    },
                    annotation,
                );
            }

            let highlight =
                Highlight::for_annotation(annotation, identifier, &self.catalog, &self.config);

            // Later leaves first so earlier leaf paths stay valid
            let mut marked = Vec::with_capacity(resolution.intersections.len());
            for hit in resolution.intersections.iter().rev() {
                match splice(&mut fragment, hit, &highlight) {
                    Ok(text) => marked.push(text),
                    Err(reason) => report(reason, annotation),
                }
            }
            highlights.extend(marked.into_iter().rev().map(|text| RenderedHighlight {
                clause_type: highlight.clause_type.clone(),
                identifier: highlight.identifier.clone(),
                text,
            }));
        }

        let page_count = match page {
            Some(page) => {
                pagination::apply_page_visibility(&mut fragment, page, &self.config.page_class)
            }
            None => pagination::page_count(&fragment, &self.config.page_class),
        };

        tracing::debug!(
            "Overlay pass emitted {} highlight spans, skipped {}",
            highlights.len(),
            skipped
        );

        Ok(OverlayResult {
            markup: fragment.to_markup(),
            highlights,
            page_count,
            skipped,
        })
    }

    /// Click lookup under the configured identifier scheme
    pub fn resolve_click<'a>(
        &self,
        clicked_type: &str,
        clicked_identifier: &str,
        annotations: &'a AnnotationSet,
    ) -> Option<&'a Annotation> {
        resolve_click_with(
            self.config.identifier_scheme,
            clicked_type,
            clicked_identifier,
            annotations,
        )
    }
}
