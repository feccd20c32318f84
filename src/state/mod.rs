//! State module for tracking crawl outcomes
//!
//! # Components
//!
//! - `DomainOutcome`: How a single domain's pipeline ended (found, none found, failed)
//! - `Tier`: Which fetch tier was involved
//! - `CrawlResult`: The per-run mapping of domain to report

mod crawl_result;
mod domain_outcome;

// Re-export main types
pub use crawl_result::{CrawlResult, DomainReport};
pub use domain_outcome::{DomainOutcome, Tier};
