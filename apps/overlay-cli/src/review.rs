//! One CLI review run: overlay a structured document and optionally resolve a click

use anyhow::{bail, Context};
use overlay_engine::{
    ActiveFilter, AnnotationSet, ClickTarget, CollectingSink, OverlayEngine, RenderedHighlight,
};
use serde::Serialize;
use shared_types::{Annotation, StructuredDocument};
use std::fs;
use std::path::Path;

use crate::config::CliConfig;

#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub document: StructuredDocument,
    pub user_annotations: Vec<Annotation>,
    /// `None` enables every catalogued or present clause type
    pub types: Option<Vec<String>>,
    pub page: Option<usize>,
    pub click: Option<ClickTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutput {
    pub markup: String,
    pub highlights: Vec<RenderedHighlight>,
    pub page_count: usize,
    pub skipped: usize,
    pub clicked: Option<Annotation>,
}

pub fn load_document<P: AsRef<Path>>(path: P) -> anyhow::Result<StructuredDocument> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse document JSON: {}", path.display()))
}

pub fn load_user_annotations<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Annotation>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read user annotations: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse user annotations: {}", path.display()))
}

/// Parse `--click TYPE=ID`
pub fn parse_click(arg: &str) -> anyhow::Result<ClickTarget> {
    let Some((clause_type, identifier)) = arg.split_once('=') else {
        bail!("Expected TYPE=ID, got '{}'", arg);
    };
    if clause_type.trim().is_empty() || identifier.trim().is_empty() {
        bail!("Expected TYPE=ID, got '{}'", arg);
    }
    Ok(ClickTarget::new(clause_type.trim(), identifier.trim()))
}

/// Parse `--types a,b`
pub fn parse_types(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn run_review(config: &CliConfig, request: ReviewRequest) -> ReviewOutput {
    let engine = OverlayEngine::with_config(config.catalog.clone(), config.overlay.clone());
    let ReviewRequest {
        document,
        user_annotations,
        types,
        page,
        click,
    } = request;
    let annotations = AnnotationSet::new(document.detected_annotations(), user_annotations);

    let filter: ActiveFilter = match types {
        Some(types) => types.into_iter().collect(),
        None => {
            let mut filter = ActiveFilter::all_from(engine.catalog());
            for clause_type in annotations.clause_types() {
                filter.enable(clause_type);
            }
            filter
        }
    };

    let clicked = click.and_then(|target| {
        engine
            .resolve_click(&target.clause_type, &target.identifier, &annotations)
            .cloned()
    });

    if !document.is_structured() {
        tracing::warn!(
            "Document {} is not structured ({}); emitting raw content",
            document.id,
            document.content_type
        );
        return ReviewOutput {
            markup: document.content,
            highlights: Vec::new(),
            page_count: 0,
            skipped: 0,
            clicked,
        };
    }

    let mut sink = CollectingSink::new();
    match engine.render_with_sink(&document.content, &annotations, &filter, page, &mut sink) {
        Ok(result) => {
            tracing::info!(
                "Rendered {} highlights over {} pages ({} annotations skipped)",
                result.highlights.len(),
                result.page_count,
                result.skipped
            );
            ReviewOutput {
                markup: result.markup,
                highlights: result.highlights,
                page_count: result.page_count,
                skipped: result.skipped,
                clicked,
            }
        }
        Err(e) => {
            tracing::warn!("Showing unhighlighted content: {}", e);
            ReviewOutput {
                markup: document.content,
                highlights: Vec::new(),
                page_count: 0,
                skipped: 0,
                clicked,
            }
        }
    }
}
