//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and a scripted
//! renderer to test the full crawl cycle end-to-end, through to the JSON
//! results document on disk.

use shelf_sweep::config::{
    parse_config, Config, CrawlerConfig, DomainEntry, OutputConfig, PatternsConfig,
    RendererConfig, UserAgentConfig,
};
use shelf_sweep::crawler::{run_crawl, Renderer};
use shelf_sweep::output::build_output_handlers;
use shelf_sweep::state::DomainOutcome;
use shelf_sweep::RenderError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renderer that serves canned markup per URL and records every call
#[derive(Default)]
struct ScriptedRenderer {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
    rendered: Mutex<Vec<String>>,
}

impl ScriptedRenderer {
    fn with_page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(url.to_string(), markup.to_string());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Renderer for ScriptedRenderer {
    fn render(&self, url: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rendered.lock().unwrap().push(url.to_string());

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })
    }
}

/// Creates a test configuration for the given domains
fn create_test_config(domains: &[String], results_path: &Path, summary_path: Option<&Path>) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            max_concurrent_domains: None,
        },
        renderer: RendererConfig::default(),
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            results_path: results_path.display().to_string(),
            summary_path: summary_path.map(|p| p.display().to_string()),
        },
        patterns: PatternsConfig::default(),
        domains: domains
            .iter()
            .map(|url| DomainEntry { url: url.clone() })
            .collect(),
    }
}

async fn serve_root(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn read_results(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("results file should exist");
    serde_json::from_str(&content).expect("results file should be valid JSON")
}

#[tokio::test]
async fn test_static_hit_writes_results() {
    let server = MockServer::start().await;
    serve_root(
        &server,
        200,
        r#"<html><body>
            <a href="/product/123">Widget</a>
            <a href="/about">About</a>
            <a href="/item/45">Gadget</a>
            <a href="/product/123">Widget again</a>
        </body></html>"#,
    )
    .await;

    let dir = tempdir().unwrap();
    let results_path = dir.path().join("product_urls.json");
    let config = create_test_config(&[server.uri()], &results_path, None);

    let renderer = Arc::new(ScriptedRenderer::default());
    let outputs = build_output_handlers(&config.output, "test-hash");

    let result = run_crawl(&config, renderer.clone(), &outputs).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(
        result.get(&server.uri()).unwrap().outcome,
        DomainOutcome::FoundStatic
    );
    assert_eq!(renderer.calls(), 0, "static hit must not render");

    let mut expected = serde_json::Map::new();
    expected.insert(
        server.uri(),
        serde_json::json!(["/item/45", "/product/123"]),
    );
    assert_eq!(read_results(&results_path), serde_json::Value::Object(expected));
}

#[tokio::test]
async fn test_mixed_domains_complete_and_isolated() {
    // Static hit
    let static_server = MockServer::start().await;
    serve_root(&static_server, 200, r#"<a href="/p/1">One</a>"#).await;

    // Script-only catalogue: static markup is an empty shell
    let rendered_server = MockServer::start().await;
    serve_root(&rendered_server, 200, r#"<div id="app"></div>"#).await;

    // Static fetch fails outright
    let broken_server = MockServer::start().await;
    serve_root(&broken_server, 503, "Service Unavailable").await;

    // Nothing anywhere
    let empty_server = MockServer::start().await;
    serve_root(&empty_server, 200, r#"<a href="/contact">Contact</a>"#).await;

    // Render step fails
    let render_fail_server = MockServer::start().await;
    serve_root(&render_fail_server, 200, "<p>loading</p>").await;

    let renderer = Arc::new(
        ScriptedRenderer::default()
            .with_page(
                &rendered_server.uri(),
                r#"<div id="app"><a href="/item/77">Rendered</a></div>"#,
            )
            .with_page(&empty_server.uri(), r#"<a href="/faq">FAQ</a>"#),
    );

    let domains = vec![
        static_server.uri(),
        rendered_server.uri(),
        broken_server.uri(),
        empty_server.uri(),
        render_fail_server.uri(),
    ];

    let dir = tempdir().unwrap();
    let results_path = dir.path().join("product_urls.json");
    let summary_path = dir.path().join("summary.md");
    let config = create_test_config(&domains, &results_path, Some(&summary_path));
    let outputs = build_output_handlers(&config.output, "test-hash");

    let result = run_crawl(&config, renderer.clone(), &outputs).await.unwrap();

    // One entry per configured domain, regardless of outcome
    assert_eq!(result.len(), domains.len());
    for domain in &domains {
        assert!(result.contains(domain), "missing entry for {}", domain);
    }

    let outcome = |d: &String| result.get(d).unwrap().outcome;
    assert_eq!(outcome(&static_server.uri()), DomainOutcome::FoundStatic);
    assert_eq!(outcome(&rendered_server.uri()), DomainOutcome::FoundRendered);
    assert_eq!(outcome(&broken_server.uri()), DomainOutcome::FetchFailed);
    assert_eq!(outcome(&empty_server.uri()), DomainOutcome::NoneFound);
    assert_eq!(outcome(&render_fail_server.uri()), DomainOutcome::RenderFailed);

    // Rendered once each for the three domains whose static markup had nothing;
    // never for the static hit or the failed fetch
    assert_eq!(renderer.calls(), 3);
    let rendered = renderer.rendered.lock().unwrap().clone();
    assert!(!rendered.contains(&static_server.uri()));
    assert!(!rendered.contains(&broken_server.uri()));

    let json = read_results(&results_path);
    assert_eq!(json[&static_server.uri()], serde_json::json!(["/p/1"]));
    assert_eq!(json[&rendered_server.uri()], serde_json::json!(["/item/77"]));
    assert_eq!(json[&broken_server.uri()], serde_json::json!([]));
    assert_eq!(json[&empty_server.uri()], serde_json::json!([]));
    assert_eq!(json[&render_fail_server.uri()], serde_json::json!([]));
    assert_eq!(json.as_object().unwrap().len(), domains.len());

    let summary = std::fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("- **Config Hash**: test-hash"));
    assert!(summary.contains("## Failures"));
    assert!(summary.contains("| Found (rendered) | 1 |"));
}

#[tokio::test]
async fn test_concurrency_cap_still_completes() {
    let mut servers = Vec::new();
    for i in 0..4 {
        let server = MockServer::start().await;
        serve_root(&server, 200, &format!(r#"<a href="/product/{}">P</a>"#, i)).await;
        servers.push(server);
    }
    let domains: Vec<String> = servers.iter().map(|s| s.uri()).collect();

    let dir = tempdir().unwrap();
    let results_path = dir.path().join("product_urls.json");
    let mut config = create_test_config(&domains, &results_path, None);
    config.crawler.max_concurrent_domains = Some(1);

    let outputs = build_output_handlers(&config.output, "test-hash");
    let result = run_crawl(&config, Arc::new(ScriptedRenderer::default()), &outputs)
        .await
        .unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(result.total_urls(), 4);
    assert_eq!(result.count_outcome(DomainOutcome::FoundStatic), 4);
}

#[tokio::test]
async fn test_custom_patterns_from_toml() {
    let server = MockServer::start().await;
    serve_root(
        &server,
        200,
        r#"<a href="/sku/991">SKU</a><a href="/product/5">Product</a>"#,
    )
    .await;

    let dir = tempdir().unwrap();
    let results_path = dir.path().join("out.json");

    let toml = format!(
        r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
results-path = "{}"

[patterns]
product = ['/sku/\d+']

[[domain]]
url = "{}"
"#,
        results_path.display(),
        server.uri()
    );

    let config = parse_config(&toml).unwrap();
    let outputs = build_output_handlers(&config.output, "test-hash");
    run_crawl(&config, Arc::new(ScriptedRenderer::default()), &outputs)
        .await
        .unwrap();

    let json = read_results(&results_path);
    assert_eq!(json[&server.uri()], serde_json::json!(["/sku/991"]));
}

#[tokio::test]
async fn test_unwritable_output_fails_run() {
    let server = MockServer::start().await;
    serve_root(&server, 200, r#"<a href="/p/1">One</a>"#).await;

    let config = create_test_config(
        &[server.uri()],
        Path::new("/nonexistent/dir/product_urls.json"),
        None,
    );
    let outputs = build_output_handlers(&config.output, "test-hash");

    let result = run_crawl(&config, Arc::new(ScriptedRenderer::default()), &outputs).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unwritable_summary_leaves_previous_results() {
    let server = MockServer::start().await;
    serve_root(&server, 200, r#"<a href="/p/1">One</a>"#).await;

    let dir = tempdir().unwrap();
    let results_path = dir.path().join("product_urls.json");
    std::fs::write(&results_path, r#"{"http://previous.run": ["/p/9"]}"#).unwrap();

    let config = create_test_config(
        &[server.uri()],
        &results_path,
        Some(Path::new("/nonexistent/dir/summary.md")),
    );
    let outputs = build_output_handlers(&config.output, "test-hash");

    let result = run_crawl(&config, Arc::new(ScriptedRenderer::default()), &outputs).await;

    assert!(result.is_err());
    assert_eq!(
        read_results(&results_path),
        serde_json::json!({ "http://previous.run": ["/p/9"] })
    );
    assert!(!dir.path().join("product_urls.json.tmp").exists());
}
