use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on in-flight detail pages
const MAX_CONCURRENCY: u32 = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.listing_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid listing-url '{}': {}",
            config.listing_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "listing-url '{}' must use http or https",
            config.listing_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "listing-url '{}' has no host",
            config.listing_url
        )));
    }

    if config.source_tag.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source-tag cannot be empty".to_string(),
        ));
    }

    if config.detail_path_markers.is_empty() {
        return Err(ConfigError::Validation(
            "detail-path-markers must contain at least one marker".to_string(),
        ));
    }

    if config
        .detail_path_markers
        .iter()
        .any(|marker| marker.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "detail-path-markers cannot contain empty markers".to_string(),
        ));
    }

    if let Some(pattern) = &config.allowed_domain {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.max_delay < config.min_delay {
        return Err(ConfigError::Validation(format!(
            "max-delay ({}ms) must be >= min-delay ({}ms)",
            config.max_delay, config.min_delay
        )));
    }

    if config.navigation_timeout == 0 || config.idle_timeout == 0 {
        return Err(ConfigError::Validation(
            "navigation-timeout and idle-timeout must be > 0".to_string(),
        ));
    }

    if config.max_listing_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-listing-pages must be >= 1, got {}",
            config.max_listing_pages
        )));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint-interval must be >= 1, got {}",
            config.checkpoint_interval
        )));
    }

    if config.target_count == Some(0) {
        return Err(ConfigError::Validation(
            "target-count must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    let names = [
        ("directory", &config.directory),
        ("records-jsonl", &config.records_jsonl),
        ("records-csv", &config.records_csv),
        ("failures-csv", &config.failures_csv),
        ("progress", &config.progress),
        ("debug-directory", &config.debug_directory),
        ("summary", &config.summary),
    ];

    for (key, value) in names {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);

    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains("..")
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' is malformed",
            domain
        )));
    }

    Ok(())
}
