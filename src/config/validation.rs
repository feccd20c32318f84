use crate::config::types::{
    Config, CrawlerConfig, DomainEntry, OutputConfig, PatternsConfig, RendererConfig,
    UserAgentConfig,
};
use crate::url::PatternMatcher;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_patterns(&config.patterns)?;
    validate_domains(&config.domains)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if let Some(cap) = config.max_concurrent_domains {
        if !(1..=256).contains(&cap) {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_domains must be between 1 and 256, got {}",
                cap
            )));
        }
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.settle_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "settle_ms must be <= 60000ms, got {}ms",
            config.settle_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "renderer timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    // The settle wait happens inside the render timeout
    if config.timeout_secs.saturating_mul(1000) <= config.settle_ms {
        return Err(ConfigError::Validation(format!(
            "renderer timeout_secs ({}s) must exceed settle_ms ({}ms)",
            config.timeout_secs, config.settle_ms
        )));
    }

    if let Some(path) = &config.chrome_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chrome_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    if let Some(summary_path) = &config.summary_path {
        if summary_path.is_empty() {
            return Err(ConfigError::Validation(
                "summary_path cannot be empty when set".to_string(),
            ));
        }

        if summary_path == &config.results_path {
            return Err(ConfigError::Validation(
                "summary_path must differ from results_path".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the product pattern list
fn validate_patterns(config: &PatternsConfig) -> Result<(), ConfigError> {
    if config.product.is_empty() {
        return Err(ConfigError::Validation(
            "at least one product pattern is required".to_string(),
        ));
    }

    // Compiling reports the first bad pattern
    PatternMatcher::new(&config.product)?;

    Ok(())
}

/// Validates domain entries
fn validate_domains(domains: &[DomainEntry]) -> Result<(), ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[domain]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for entry in domains {
        validate_domain_url(&entry.url)?;

        if !seen.insert(entry.url.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Domain '{}' is listed more than once",
                entry.url
            )));
        }
    }

    Ok(())
}

/// Validates a domain root URL
fn validate_domain_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid domain URL '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Domain URL '{}' must use http or https",
            raw
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Domain URL '{}' has no host",
            raw
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Exactly one @ with text on both sides
    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            (local, domain)
        }
        _ => {
            return Err(ConfigError::Validation(format!(
                "Invalid email format: '{}'",
                email
            )))
        }
    };

    if local.contains(char::is_whitespace) || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
