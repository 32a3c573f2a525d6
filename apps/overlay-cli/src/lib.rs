//! Command-line clause review: render annotation overlays for structured
//! documents outside the browser.

pub mod config;
pub mod review;

pub use config::CliConfig;
pub use review::{
    load_document, load_user_annotations, parse_click, parse_types, run_review, ReviewOutput,
    ReviewRequest,
};
