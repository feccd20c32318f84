//! Shelf-Sweep: a product URL discovery crawler
//!
//! This crate visits the landing page of each configured e-commerce domain,
//! extracts links that look like product-detail pages, and falls back to a
//! headless-browser render when the static markup carries none.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Shelf-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Static fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid product pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Errors from the static (tier 1) fetch of a domain root
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Short machine-readable label for logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Timeout { .. } => "timeout",
            Self::Connect { .. } => "connect",
            Self::Status { .. } => "status",
            Self::Body { .. } => "body",
        }
    }
}

/// Errors from the rendered (tier 2) fetch of a domain root
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Render of {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Failed to read rendered content of {url}: {message}")]
    Content { url: String, message: String },

    #[error("Render worker failed: {0}")]
    Worker(String),

    #[error("Render of {url} cancelled by shutdown")]
    Cancelled { url: String },
}

impl RenderError {
    /// Short machine-readable label for logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch(_) => "launch",
            Self::Navigation { .. } => "navigation",
            Self::Timeout { .. } => "timeout",
            Self::Content { .. } => "content",
            Self::Worker(_) => "worker",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

/// Result type alias for Shelf-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract_product_links, Coordinator, FetchStrategy, Renderer, UrlSet};
pub use state::{CrawlResult, DomainOutcome, DomainReport, Tier};
pub use url::PatternMatcher;
