use crate::url::DEFAULT_PRODUCT_PATTERNS;
use serde::Deserialize;

/// Main configuration structure for Shelf-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default, rename = "domain")]
    pub domains: Vec<DomainEntry>,
}

impl Config {
    /// Domain root URLs in configuration order
    pub fn domain_urls(&self) -> Vec<String> {
        self.domains.iter().map(|d| d.url.clone()).collect()
    }
}

/// Static fetch and fan-out configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Total time allowed for one static fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of domains crawled at once (unbounded when absent)
    #[serde(rename = "max-concurrent-domains")]
    pub max_concurrent_domains: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_concurrent_domains: None,
        }
    }
}

/// Headless browser configuration for the rendered fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Time to let page scripts run after navigation (milliseconds)
    #[serde(rename = "settle-ms")]
    pub settle_ms: u64,

    /// Hard limit on one render, after which the browser is killed (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Chrome/Chromium executable; auto-detected when absent
    #[serde(rename = "chrome-path")]
    pub chrome_path: Option<String>,

    /// Launch Chrome with `--no-sandbox` (needed in some containers)
    #[serde(rename = "no-sandbox")]
    pub no_sandbox: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            settle_ms: 5000,
            timeout_secs: 60,
            chrome_path: None,
            no_sandbox: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON results document
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Path to the optional markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// Product URL pattern configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PatternsConfig {
    /// Regular expressions, any of which marks an href as a product URL
    #[serde(default = "default_product_patterns")]
    pub product: Vec<String>,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            product: default_product_patterns(),
        }
    }
}

fn default_product_patterns() -> Vec<String> {
    DEFAULT_PRODUCT_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// A domain to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Root URL of the site (e.g., "https://shop.example.com")
    pub url: String,
}
