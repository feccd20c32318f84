//! Two-tier fetch strategy for a single domain
//!
//! 1. Static GET of the domain root, then extraction.
//! 2. Only if that yields nothing: one rendered fetch of the same URL, then
//!    extraction again.
//!
//! An empty tier 1 result cannot tell "this page lists no products" apart
//! from "products are injected client-side". Both trigger the render, so a
//! genuinely product-less page still pays for a browser launch.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::{extract_product_links, UrlSet};
use crate::crawler::renderer::{render_on_worker, Renderer};
use crate::state::{DomainOutcome, DomainReport, Tier};
use crate::url::PatternMatcher;
use crate::{FetchError, RenderError};
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

/// A failure that ended one domain's pipeline
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("static fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("rendered fetch failed: {0}")]
    Render(#[from] RenderError),
}

impl DomainError {
    /// The tier that failed
    pub fn tier(&self) -> Tier {
        match self {
            Self::Fetch(_) => Tier::Static,
            Self::Render(_) => Tier::Rendered,
        }
    }

    /// Short label of the underlying error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.kind(),
            Self::Render(e) => e.kind(),
        }
    }

    /// The failure marker recorded for the domain
    pub fn outcome(&self) -> DomainOutcome {
        match self {
            Self::Fetch(_) => DomainOutcome::FetchFailed,
            Self::Render(_) => DomainOutcome::RenderFailed,
        }
    }

    /// Converts the error into the domain's placeholder report
    pub fn into_report(self) -> DomainReport {
        let outcome = self.outcome();
        DomainReport::failed(outcome, self.to_string())
    }
}

/// Product URLs found for one domain and the tier that found them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutput {
    pub urls: UrlSet,
    pub outcome: DomainOutcome,
}

impl From<StrategyOutput> for DomainReport {
    fn from(output: StrategyOutput) -> Self {
        DomainReport::found(output.urls, output.outcome)
    }
}

/// Resolves the final URL set for a domain with the static-then-render policy
///
/// The strategy is cheap to clone; the HTTP client, matcher, and renderer are
/// shared handles.
#[derive(Clone)]
pub struct FetchStrategy {
    client: Client,
    matcher: Arc<PatternMatcher>,
    renderer: Arc<dyn Renderer>,
}

impl FetchStrategy {
    pub fn new(client: Client, matcher: Arc<PatternMatcher>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            client,
            matcher,
            renderer,
        }
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Runs both tiers as needed for `domain`
    ///
    /// # Returns
    ///
    /// * `Ok(StrategyOutput)` - The (possibly empty) product URL set
    /// * `Err(DomainError)` - The static fetch or the render failed
    pub async fn resolve(&self, domain: &str) -> Result<StrategyOutput, DomainError> {
        tracing::info!("Crawling domain: {}", domain);

        let markup = fetch_page(&self.client, domain).await?;
        let urls = extract_product_links(&markup, &self.matcher);
        drop(markup);

        if !urls.is_empty() {
            tracing::info!(
                "Found {} product URLs on {} in static markup",
                urls.len(),
                domain
            );
            return Ok(StrategyOutput {
                urls,
                outcome: DomainOutcome::FoundStatic,
            });
        }

        tracing::info!(
            "No product URLs found on {}, falling back to rendered fetch",
            domain
        );

        let rendered = render_on_worker(self.renderer.clone(), domain).await?;
        let urls = extract_product_links(&rendered, &self.matcher);

        let outcome = if urls.is_empty() {
            tracing::info!("No product URLs found on {} after rendering", domain);
            DomainOutcome::NoneFound
        } else {
            tracing::info!(
                "Found {} product URLs on {} after rendering",
                urls.len(),
                domain
            );
            DomainOutcome::FoundRendered
        };

        Ok(StrategyOutput { urls, outcome })
    }

    /// Runs [`resolve`](Self::resolve) and converts failures into a placeholder report
    pub async fn resolve_report(&self, domain: &str) -> DomainReport {
        match self.resolve(domain).await {
            Ok(output) => output.into(),
            Err(e) => {
                tracing::warn!(
                    domain = domain,
                    tier = %e.tier(),
                    kind = e.kind(),
                    "Domain crawl failed: {}",
                    e
                );
                e.into_report()
            }
        }
    }
}
