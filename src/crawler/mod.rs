//! Crawler module for product URL discovery
//!
//! This module contains the core crawling logic, including:
//! - Static HTTP fetching
//! - Headless browser rendering as a fallback
//! - HTML parsing and product link extraction
//! - The per-domain two-tier fetch strategy
//! - Concurrent crawl coordination across domains

mod coordinator;
mod fetcher;
mod parser;
mod renderer;
mod strategy;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, format_user_agent};
pub use parser::{extract_from_source, extract_product_links, parse_document, AnchorSource, UrlSet};
pub use renderer::{render_on_worker, ChromeRenderer, Renderer};
pub use strategy::{DomainError, FetchStrategy, StrategyOutput};
