use crate::config::types::{Config, CrawlerConfig, HttpConfig, MatcherEntry, MatcherKind};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_matchers("whitelist", &config.whitelist)?;
    validate_matchers("blacklist", &config.blacklist)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // limit >= 0 is always true for usize, and 0 means unbounded

    if let Some(seed) = &config.seed {
        validate_seed(seed)?;
    }

    Ok(())
}

/// Validates a seed URL: absolute, HTTP(S), with a host
pub fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS scheme",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got {:?}",
            config.user_agent
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates whitelist or blacklist matcher entries
fn validate_matchers(list: &str, entries: &[MatcherEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "{} matcher pattern cannot be empty",
                list
            )));
        }

        match entry.kind {
            MatcherKind::Host => validate_domain_pattern(&entry.pattern)?,
            MatcherKind::PathPrefix => validate_path_prefix(&entry.pattern).map_err(|_| {
                ConfigError::InvalidPattern(format!(
                    "{} path prefix '{}' must start with '/'",
                    list, entry.pattern
                ))
            })?,
            MatcherKind::PathRegex | MatcherKind::UrlRegex => {
                Regex::new(&entry.pattern).map_err(|e| {
                    ConfigError::InvalidPattern(format!(
                        "{} regex '{}' is invalid: {}",
                        list, entry.pattern, e
                    ))
                })?;
            }
        }
    }

    Ok(())
}

/// Validates a path prefix: URL paths always start with '/'
pub fn validate_path_prefix(prefix: &str) -> Result<(), ConfigError> {
    if !prefix.starts_with('/') {
        return Err(ConfigError::InvalidPattern(format!(
            "path prefix '{}' must start with '/'",
            prefix
        )));
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

    if let Some(domain) = pattern.strip_prefix("*.") {
        validate_domain_string(domain)?;
    } else {
        validate_domain_string(pattern)?;
    }

    Ok(())
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
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
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
