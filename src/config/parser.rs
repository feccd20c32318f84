use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use shelf_sweep::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Domains: {}", config.domains.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at startup and written into the run summary, so two
/// result files can be traced back to the exact configuration that produced them.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL_CONFIG: &str = r#"
[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
results-path = "./product_urls.json"

[[domain]]
url = "http://example1.com"

[[domain]]
url = "https://example2.com"
"#;

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
request-timeout-secs = 15
connect-timeout-secs = 5
max-concurrent-domains = 4

[renderer]
settle-ms = 2000
timeout-secs = 30
no-sandbox = true

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
results-path = "./product_urls.json"
summary-path = "./summary.md"

[patterns]
product = ['/sku/\d+', '/product/\d+']

[[domain]]
url = "https://shop.example.com"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.request_timeout_secs, 15);
        assert_eq!(config.crawler.max_concurrent_domains, Some(4));
        assert_eq!(config.renderer.settle_ms, 2000);
        assert!(config.renderer.no_sandbox);
        assert_eq!(config.output.summary_path.as_deref(), Some("./summary.md"));
        assert_eq!(config.patterns.product, vec![r"/sku/\d+", r"/product/\d+"]);
        assert_eq!(config.domain_urls(), vec!["https://shop.example.com"]);
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse_config(MINIMAL_CONFIG).unwrap();

        assert_eq!(config.crawler.request_timeout_secs, 30);
        assert_eq!(config.crawler.connect_timeout_secs, 10);
        assert_eq!(config.crawler.max_concurrent_domains, None);
        assert_eq!(config.renderer.settle_ms, 5000);
        assert_eq!(config.renderer.timeout_secs, 60);
        assert_eq!(config.output.summary_path, None);
        assert_eq!(
            config.patterns.product,
            vec![r"/product/\d+", r"/item/\d+", r"/p/\d+"]
        );
    }

    #[test]
    fn test_domains_keep_configuration_order() {
        let config = parse_config(MINIMAL_CONFIG).unwrap();
        assert_eq!(
            config.domain_urls(),
            vec!["http://example1.com", "https://example2.com"]
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = MINIMAL_CONFIG.replace("http://example1.com", "ftp://example1.com");
        let result = parse_config(&config_content);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config_content = format!("{}\n[patterns]\nproduct = ['/product/(\\d+']\n", MINIMAL_CONFIG);
        let result = parse_config(&config_content);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config(MINIMAL_CONFIG);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.domains.len(), 2);
        assert_eq!(hash.len(), 64);
    }
}
