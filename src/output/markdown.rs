//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl run,
//! including outcome counts, a per-domain table, and a failure report.

use crate::output::traits::{write_atomically, CrawlSummary, OutputHandler, OutputResult};
use crate::state::CrawlResult;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Generates a markdown summary file from crawl statistics
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    write_atomically(output_path, &markdown)
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Shelf Sweep Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    let duration = summary.duration_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Domains**: {}\n", summary.total_domains));
    md.push_str(&format!("- **Product URLs**: {}\n", summary.total_urls));
    md.push_str(&format!(
        "- **Rendered Fetches**: {}\n",
        summary.total_rendered()
    ));
    md.push_str(&format!("- **Failures**: {}\n", summary.total_failures()));
    md.push_str(&format!("- **Hit Rate**: {:.2}%\n\n", summary.hit_rate()));

    // Outcome breakdown
    md.push_str("## Outcome Breakdown\n\n");
    md.push_str("| Outcome | Domains |\n");
    md.push_str("|---------|---------|\n");
    md.push_str(&format!("| Found (static) | {} |\n", summary.found_static));
    md.push_str(&format!(
        "| Found (rendered) | {} |\n",
        summary.found_rendered
    ));
    md.push_str(&format!("| None found | {} |\n", summary.none_found));
    md.push_str(&format!("| Fetch failed | {} |\n", summary.fetch_failed));
    md.push_str(&format!("| Render failed | {} |\n", summary.render_failed));
    md.push_str(&format!("| Aborted | {} |\n\n", summary.aborted));

    // Per-domain table
    if !summary.domains.is_empty() {
        md.push_str("## Domains\n\n");
        md.push_str("| Domain | Outcome | URLs |\n");
        md.push_str("|--------|---------|------|\n");
        for row in &summary.domains {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                row.domain, row.outcome, row.url_count
            ));
        }
        md.push('\n');
    }

    // Failures
    let failures: Vec<_> = summary
        .domains
        .iter()
        .filter(|row| row.outcome.is_failure())
        .collect();

    if !failures.is_empty() {
        md.push_str("## Failures\n\n");
        for row in failures {
            md.push_str(&format!(
                "- **{}** ({}): {}\n",
                row.domain,
                row.outcome,
                row.error.as_deref().unwrap_or("no details")
            ));
        }
        md.push('\n');
    }

    md
}

/// Output handler that writes the markdown run summary
#[derive(Debug, Clone)]
pub struct MarkdownOutputHandler {
    path: PathBuf,
    config_hash: String,
    started_at: DateTime<Utc>,
}

impl MarkdownOutputHandler {
    /// Creates a handler; the run start time is taken as now
    pub fn new(path: impl Into<PathBuf>, config_hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            config_hash: config_hash.into(),
            started_at: Utc::now(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for MarkdownOutputHandler {
    fn write_results(&self, result: &CrawlResult) -> OutputResult<()> {
        let summary =
            CrawlSummary::from_result(result, self.started_at, Utc::now(), &self.config_hash);
        generate_markdown_summary(&summary, &self.path)?;

        tracing::info!("Summary written to {}", self.path.display());
        Ok(())
    }
}
