//! Statistics generation from a finished crawl
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics at the end of a run.

use crate::state::{CrawlResult, DomainOutcome};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of domains in the result
    pub total_domains: usize,

    /// Count of domains by outcome
    pub domains_by_outcome: BTreeMap<&'static str, usize>,

    /// Total number of product URLs found across domains
    pub total_urls: usize,

    /// Domains whose entry is a failure placeholder, with the error text
    pub failed_domains: Vec<(String, String)>,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl result
    pub fn from_result(result: &CrawlResult) -> Self {
        let mut domains_by_outcome = BTreeMap::new();

        for outcome in DomainOutcome::all_outcomes() {
            let count = result.count_outcome(outcome);
            if count > 0 {
                domains_by_outcome.insert(outcome.as_str(), count);
            }
        }

        let failed_domains = result
            .failures()
            .into_iter()
            .map(|(domain, report)| {
                (
                    domain.to_string(),
                    report.error.clone().unwrap_or_else(|| report.outcome.to_string()),
                )
            })
            .collect();

        Self {
            total_domains: result.len(),
            domains_by_outcome,
            total_urls: result.total_urls(),
            failed_domains,
        }
    }

    /// Number of domains that yielded at least one product URL
    pub fn domains_with_urls(&self) -> usize {
        [DomainOutcome::FoundStatic, DomainOutcome::FoundRendered]
            .iter()
            .filter_map(|o| self.domains_by_outcome.get(o.as_str()))
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Domains crawled: {}", stats.total_domains);
    println!("  Product URLs found: {}", stats.total_urls);
    println!();

    println!("Domains by Outcome:");
    // Sort outcomes by count (descending)
    let mut outcome_counts: Vec<_> = stats.domains_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (outcome, count) in outcome_counts {
        let percentage = if stats.total_domains > 0 {
            (*count as f64 / stats.total_domains as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", outcome, count, percentage);
    }
    println!();

    if !stats.failed_domains.is_empty() {
        println!("Failed Domains ({}):", stats.failed_domains.len());
        for (domain, error) in &stats.failed_domains {
            println!("  - {}: {}", domain, error);
        }
        println!();
    }

    let hits = stats.domains_with_urls();
    let hit_rate = if stats.total_domains > 0 {
        (hits as f64 / stats.total_domains as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Hit Rate: {:.1}% ({} / {} domains yielded product URLs)",
        hit_rate, hits, stats.total_domains
    );
}
