//! Overlay CLI Binary
//!
//! Renders highlighted markup for a structured document. Markup goes to
//! stdout (or `--output`); logs go to stderr.

use anyhow::Context;
use clap::Parser;
use overlay_cli::{
    load_document, load_user_annotations, parse_click, parse_types, run_review, CliConfig,
    ReviewRequest,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "overlay-cli")]
#[command(version, about = "Render clause annotation overlays for structured documents")]
struct Args {
    /// Structured document JSON (content, content_type, clauses)
    #[arg(long)]
    document: PathBuf,

    /// TOML config with [overlay] and [catalog] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of user annotations
    #[arg(long)]
    user: Option<PathBuf>,

    /// Comma-separated clause types to show (default: all)
    #[arg(long)]
    types: Option<String>,

    /// 1-based page to leave visible
    #[arg(long)]
    page: Option<usize>,

    /// Resolve a clicked highlight, given as TYPE=ID
    #[arg(long)]
    click: Option<String>,

    /// Write markup here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries markup only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    let user_annotations = match &args.user {
        Some(path) => load_user_annotations(path)?,
        None => Vec::new(),
    };
    let click = args.click.as_deref().map(parse_click).transpose()?;

    let request = ReviewRequest {
        document: load_document(&args.document)?,
        user_annotations,
        types: args.types.as_deref().map(parse_types),
        page: args.page,
        click,
    };
    let requested_click = request.click.clone();
    let output = run_review(&config, request);

    if let Some(target) = requested_click {
        match &output.clicked {
            Some(annotation) => tracing::info!(
                "Clicked {}: {}",
                target.identifier,
                serde_json::to_string(annotation)?
            ),
            None => tracing::warn!(
                "No annotation matches {} ({})",
                target.identifier,
                target.clause_type
            ),
        }
    }

    match &args.output {
        Some(path) => fs::write(path, &output.markup)
            .with_context(|| format!("Failed to write markup: {}", path.display()))?,
        None => println!("{}", output.markup),
    }

    Ok(())
}
