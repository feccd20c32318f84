use crate::crawler::UrlSet;
use crate::state::DomainOutcome;
use std::collections::BTreeMap;

/// What one domain's pipeline produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    /// Product URLs discovered for the domain (empty on failure)
    pub urls: UrlSet,

    /// How the domain's pipeline ended
    pub outcome: DomainOutcome,

    /// Error description when the outcome is a failure
    pub error: Option<String>,
}

impl DomainReport {
    /// Creates a report for a pipeline that ran to completion
    pub fn found(urls: UrlSet, outcome: DomainOutcome) -> Self {
        Self {
            urls,
            outcome,
            error: None,
        }
    }

    /// Creates a failure placeholder with an empty URL set
    pub fn failed(outcome: DomainOutcome, error: impl Into<String>) -> Self {
        Self {
            urls: UrlSet::new(),
            outcome,
            error: Some(error.into()),
        }
    }
}

/// The complete mapping of domains to their reports for one run
///
/// After [`Coordinator::crawl_all`](crate::crawler::Coordinator::crawl_all)
/// returns, the key set equals the configured domain list exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    reports: BTreeMap<String, DomainReport>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a domain's report, returning the previous one if the key existed
    pub fn insert(&mut self, domain: impl Into<String>, report: DomainReport) -> Option<DomainReport> {
        self.reports.insert(domain.into(), report)
    }

    pub fn get(&self, domain: &str) -> Option<&DomainReport> {
        self.reports.get(domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.reports.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Iterates over domains in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DomainReport)> {
        self.reports.iter()
    }

    pub fn domains(&self) -> impl Iterator<Item = &String> {
        self.reports.keys()
    }

    /// Total number of product URLs across all domains
    pub fn total_urls(&self) -> usize {
        self.reports.values().map(|r| r.urls.len()).sum()
    }

    /// Number of domains whose pipeline ended with the given outcome
    pub fn count_outcome(&self, outcome: DomainOutcome) -> usize {
        self.reports.values().filter(|r| r.outcome == outcome).count()
    }

    /// Domains whose entry is a failure placeholder, with their error text
    pub fn failures(&self) -> Vec<(&str, &DomainReport)> {
        self.reports
            .iter()
            .filter(|(_, r)| r.outcome.is_failure())
            .map(|(d, r)| (d.as_str(), r))
            .collect()
    }

    /// Flattens the result to the persisted shape: domain -> sorted URL list
    pub fn to_url_map(&self) -> BTreeMap<&str, Vec<&str>> {
        self.reports
            .iter()
            .map(|(domain, report)| {
                (
                    domain.as_str(),
                    report.urls.iter().map(String::as_str).collect(),
                )
            })
            .collect()
    }
}
