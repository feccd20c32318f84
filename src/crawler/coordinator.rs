//! Crawler coordinator - main crawl orchestration logic
//!
//! This module fans the fetch strategy out across every configured domain:
//! - One task per domain, all running concurrently
//! - Optional cap on in-flight domains
//! - Per-domain failure isolation
//! - A single hand-off of the finished result to the output handlers

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::renderer::Renderer;
use crate::crawler::strategy::FetchStrategy;
use crate::output::OutputHandler;
use crate::state::{CrawlResult, DomainOutcome, DomainReport};
use crate::url::PatternMatcher;
use crate::SweepError;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    domains: Vec<String>,
    strategy: FetchStrategy,
    limiter: Option<Arc<Semaphore>>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `renderer` - The rendering collaborator used for tier 2
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SweepError)` - Patterns failed to compile or the HTTP client could not be built
    pub fn new(config: &Config, renderer: Arc<dyn Renderer>) -> Result<Self, SweepError> {
        let matcher = PatternMatcher::new(&config.patterns.product)?;
        let client = build_http_client(&config.crawler, &config.user_agent)?;

        let limiter = config
            .crawler
            .max_concurrent_domains
            .map(|cap| Arc::new(Semaphore::new(cap as usize)));

        Ok(Self {
            domains: config.domain_urls(),
            strategy: FetchStrategy::new(client, Arc::new(matcher), renderer),
            limiter,
        })
    }

    /// Creates a coordinator from pre-built parts
    pub fn with_strategy(
        domains: Vec<String>,
        strategy: FetchStrategy,
        max_concurrent_domains: Option<usize>,
    ) -> Self {
        Self {
            domains,
            strategy,
            limiter: max_concurrent_domains.map(|cap| Arc::new(Semaphore::new(cap))),
        }
    }

    /// The configured domains, in configuration order
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Crawls every domain concurrently and joins the results
    ///
    /// The returned result has exactly one entry per distinct domain in
    /// `domains`. A domain whose pipeline fails gets a failure-marked entry
    /// with an empty URL set; other domains are unaffected.
    ///
    /// Dropping the returned future aborts every outstanding domain task.
    pub async fn crawl_all(&self, domains: &[String]) -> CrawlResult {
        let strategy = self.strategy.clone();
        self.join_domains(domains, move |domain| {
            let strategy = strategy.clone();
            async move { strategy.resolve_report(&domain).await }
        })
        .await
    }

    /// Spawns `resolve` once per domain and collects one report per domain
    ///
    /// A task that panics or is cancelled leaves an `Aborted` entry.
    async fn join_domains<F, Fut>(&self, domains: &[String], resolve: F) -> CrawlResult
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = DomainReport> + Send + 'static,
    {
        let mut tasks = JoinSet::new();

        for domain in domains {
            let limiter = self.limiter.clone();
            let domain = domain.clone();
            let work = resolve(domain.clone());

            tasks.spawn(async move {
                // The semaphore is never closed, so acquisition only waits
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                (domain, work.await)
            });
        }

        let mut result = CrawlResult::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((domain, report)) => {
                    result.insert(domain, report);
                }
                Err(e) => {
                    tracing::error!("Domain task did not complete: {}", e);
                }
            }
        }

        // A task that panicked never reported its domain back
        for domain in domains {
            if !result.contains(domain) {
                result.insert(
                    domain.clone(),
                    DomainReport::failed(DomainOutcome::Aborted, "domain task did not complete"),
                );
            }
        }

        result
    }

    /// Runs the crawl for the configured domains and persists the result
    ///
    /// Every handler in `outputs` receives the finished result exactly once,
    /// in order. A persistence failure fails the whole run and skips the
    /// handlers after it.
    pub async fn run(&self, outputs: &[Box<dyn OutputHandler>]) -> Result<CrawlResult, SweepError> {
        tracing::info!("Starting crawl of {} domains", self.domains.len());
        let start_time = Instant::now();

        let result = self.crawl_all(&self.domains).await;

        tracing::info!(
            "Crawl completed: {} product URLs across {} domains in {:?} ({} failed)",
            result.total_urls(),
            result.len(),
            start_time.elapsed(),
            result.failures().len()
        );

        for output in outputs {
            output.write_results(&result)?;
        }

        Ok(result)
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `renderer` - The rendering collaborator
/// * `outputs` - Where to persist the finished result
///
/// # Example
///
/// ```no_run
/// use shelf_sweep::config::load_config;
/// use shelf_sweep::crawler::{run_crawl, ChromeRenderer};
/// use shelf_sweep::output::build_output_handlers;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let renderer = Arc::new(ChromeRenderer::new(config.renderer.clone()));
/// let outputs = build_output_handlers(&config.output, "hash");
/// run_crawl(&config, renderer, &outputs).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    renderer: Arc<dyn Renderer>,
    outputs: &[Box<dyn OutputHandler>],
) -> Result<CrawlResult, SweepError> {
    let coordinator = Coordinator::new(config, renderer)?;
    coordinator.run(outputs).await
}
