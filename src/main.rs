//! Shelf-Sweep main entry point
//!
//! This is the command-line interface for the Shelf-Sweep product URL crawler.

use anyhow::Context;
use clap::Parser;
use shelf_sweep::config::{load_config_with_hash, Config};
use shelf_sweep::crawler::{run_crawl, ChromeRenderer};
use shelf_sweep::output::{build_output_handlers, print_statistics, CrawlStatistics};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit status used when the run is interrupted with Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// How long Ctrl-C waits for cancelled renders to close their browsers
const RENDER_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Shelf-Sweep: product URL discovery for e-commerce domains
///
/// Shelf-Sweep fetches the landing page of every configured domain, collects
/// links that match the product URL patterns, and renders the page in a
/// headless browser when the static markup has none.
#[derive(Parser, Debug)]
#[command(name = "shelf-sweep")]
#[command(version)]
#[command(about = "Product URL discovery crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, &config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_sweep=info,warn"),
            1 => EnvFilter::new("shelf_sweep=debug,info"),
            2 => EnvFilter::new("shelf_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Shelf-Sweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Connect timeout: {}s",
        config.crawler.connect_timeout_secs
    );
    match config.crawler.max_concurrent_domains {
        Some(cap) => println!("  Max concurrent domains: {}", cap),
        None => println!("  Max concurrent domains: unbounded"),
    }

    println!("\nRenderer:");
    println!("  Settle time: {}ms", config.renderer.settle_ms);
    println!("  Timeout: {}s", config.renderer.timeout_secs);
    println!(
        "  Chrome: {}",
        config
            .renderer
            .chrome_path
            .as_deref()
            .unwrap_or("(auto-detect)")
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    if let Some(summary_path) = &config.output.summary_path {
        println!("  Summary: {}", summary_path);
    }

    println!("\nProduct Patterns ({}):", config.patterns.product.len());
    for pattern in &config.patterns.product {
        println!("  - {}", pattern);
    }

    println!("\nDomains ({}):", config.domains.len());
    for entry in &config.domains {
        println!("  - {}", entry.url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} domains", config.domains.len());
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Domains: {}, product patterns: {}",
        config.domains.len(),
        config.patterns.product.len()
    );

    let renderer = Arc::new(ChromeRenderer::new(config.renderer.clone()));
    let outputs = build_output_handlers(&config.output, config_hash);

    // Dropping the crawl future aborts every domain task, so nothing is persisted
    let finished = tokio::select! {
        result = run_crawl(config, renderer.clone(), &outputs) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(result) = finished else {
        tracing::warn!("Received Ctrl+C, abandoning crawl without writing results");
        if renderer.shutdown(RENDER_SHUTDOWN_GRACE).await {
            tracing::info!("All browser sessions closed");
        }
        // A render stuck past the grace period would keep the runtime from exiting
        std::process::exit(INTERRUPTED_EXIT_CODE);
    };
    let result = result.context("Crawl failed")?;

    tracing::info!("Crawl completed successfully");

    if !quiet {
        print_statistics(&CrawlStatistics::from_result(&result));
    }

    Ok(())
}
