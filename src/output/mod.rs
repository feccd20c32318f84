//! Output module for persisting crawl results and reports
//!
//! This module handles:
//! - Writing the domain to product URL document as JSON
//! - Generating markdown summaries of a run
//! - Printing end-of-run statistics

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{format_results_json, JsonOutputHandler};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownOutputHandler};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{CrawlSummary, DomainSummary, OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;

/// Builds the output handlers named by the configuration
///
/// The JSON results document is always written. The markdown summary is
/// added when `summary-path` is set.
///
/// Handlers run in order and the first failure stops the run. The results
/// document comes last, so a failed run leaves the previous one in place.
///
/// # Arguments
///
/// * `config` - The output section of the configuration
/// * `config_hash` - Hash of the configuration file, recorded in the summary
pub fn build_output_handlers(config: &OutputConfig, config_hash: &str) -> Vec<Box<dyn OutputHandler>> {
    let mut handlers: Vec<Box<dyn OutputHandler>> = Vec::new();

    if let Some(summary_path) = &config.summary_path {
        handlers.push(Box::new(MarkdownOutputHandler::new(summary_path, config_hash)));
    }

    handlers.push(Box::new(JsonOutputHandler::new(&config.results_path)));

    handlers
}
