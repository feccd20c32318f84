//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and
//! associated data structures for crawl summaries.

use crate::state::{CrawlResult, DomainOutcome};
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Replaces `path` with `contents` in one step
///
/// The data goes to a sibling `.tmp` file first and is then renamed over the
/// target, so an interrupted write never leaves a truncated document behind.
pub fn write_atomically(path: &Path, contents: &str) -> OutputResult<()> {
    let io_err = |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut tmp_name = path.file_name().map(OsString::from).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let written = File::create(&tmp_path).and_then(|mut file| {
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    });

    if let Err(e) = written.and_then(|_| std::fs::rename(&tmp_path, path)) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }

    Ok(())
}

/// Trait for output handlers
///
/// An output handler persists the finished crawl result. The coordinator
/// calls [`write_results`](OutputHandler::write_results) exactly once per
/// run, after every domain has resolved.
pub trait OutputHandler: Send + Sync {
    /// Writes the complete crawl result, replacing any earlier output
    fn write_results(&self, result: &CrawlResult) -> OutputResult<()>;
}

/// One row of the per-domain summary table
#[derive(Debug, Clone)]
pub struct DomainSummary {
    pub domain: String,
    pub outcome: DomainOutcome,
    pub url_count: usize,
    pub error: Option<String>,
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,

    // Overall statistics
    pub total_domains: usize,
    pub total_urls: usize,

    // Outcome breakdown
    pub found_static: usize,
    pub found_rendered: usize,
    pub none_found: usize,
    pub fetch_failed: usize,
    pub render_failed: usize,
    pub aborted: usize,

    // Per-domain rows in domain order
    pub domains: Vec<DomainSummary>,
}

impl CrawlSummary {
    /// Builds a summary from a finished crawl result
    pub fn from_result(
        result: &CrawlResult,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        config_hash: &str,
    ) -> Self {
        let domains = result
            .iter()
            .map(|(domain, report)| DomainSummary {
                domain: domain.clone(),
                outcome: report.outcome,
                url_count: report.urls.len(),
                error: report.error.clone(),
            })
            .collect();

        Self {
            started_at,
            finished_at,
            config_hash: config_hash.to_string(),
            total_domains: result.len(),
            total_urls: result.total_urls(),
            found_static: result.count_outcome(DomainOutcome::FoundStatic),
            found_rendered: result.count_outcome(DomainOutcome::FoundRendered),
            none_found: result.count_outcome(DomainOutcome::NoneFound),
            fetch_failed: result.count_outcome(DomainOutcome::FetchFailed),
            render_failed: result.count_outcome(DomainOutcome::RenderFailed),
            aborted: result.count_outcome(DomainOutcome::Aborted),
            domains,
        }
    }

    /// Run duration in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Number of domains with a failure placeholder
    pub fn total_failures(&self) -> usize {
        self.fetch_failed + self.render_failed + self.aborted
    }

    /// Number of domains that needed the rendered fetch
    pub fn total_rendered(&self) -> usize {
        self.found_rendered + self.none_found + self.render_failed
    }

    /// Returns the share of domains that yielded at least one URL, as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.total_domains == 0 {
            return 0.0;
        }
        ((self.found_static + self.found_rendered) as f64 / self.total_domains as f64) * 100.0
    }
}
