//! Progress bar utilities
//!
//! Provides the insert progress indicator shown while batches are written.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BATCH_TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} docs ({eta})";

/// Create a progress bar counting inserted documents
pub fn create_insert_progress(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(BATCH_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// A bar that draws nothing, used when progress output is disabled
pub fn hidden_progress(total: u64) -> ProgressBar {
    ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden())
}
