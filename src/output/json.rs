//! JSON results document
//!
//! The persisted shape is a single object mapping each domain to its sorted
//! list of product URLs. Failed domains appear with an empty list.

use crate::output::traits::{write_atomically, OutputHandler, OutputResult};
use crate::state::CrawlResult;
use std::path::{Path, PathBuf};

/// Writes the crawl result as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders the result document as a pretty-printed JSON string
pub fn format_results_json(result: &CrawlResult) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&result.to_url_map())?)
}

impl OutputHandler for JsonOutputHandler {
    fn write_results(&self, result: &CrawlResult) -> OutputResult<()> {
        let json = format_results_json(result)?;

        write_atomically(&self.path, &json)?;

        tracing::info!("Results written to {}", self.path.display());
        Ok(())
    }
}
