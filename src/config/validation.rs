use crate::config::types::{Config, HttpConfig, PreloadConfig};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Upper bound on the worker pool size
pub const MAX_WORKERS: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sitemaps(&config.sitemaps)?;
    validate_preload_config(&config.preload)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates the sitemap source list
fn validate_sitemaps(sitemaps: &[String]) -> Result<(), ConfigError> {
    if sitemaps.is_empty() {
        return Err(ConfigError::Validation(
            "at least one sitemap source is required".to_string(),
        ));
    }

    for sitemap in sitemaps {
        let url = Url::parse(sitemap).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", sitemap, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Sitemap URL '{}' must use http or https",
                sitemap
            )));
        }
    }

    Ok(())
}

/// Validates worker pool configuration
fn validate_preload_config(config: &PreloadConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates the outbound header set and user agent
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty".to_string(),
            ));
        }
        HeaderValue::from_str(user_agent).map_err(|_| {
            ConfigError::Validation(format!("user-agent '{}' is not a valid header value", user_agent))
        })?;
    }

    for (name, value) in &config.headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ConfigError::Validation(format!("'{}' is not a valid header name", name))
        })?;
        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::Validation(format!(
                "value '{}' for header '{}' is not a valid header value",
                value, name
            ))
        })?;
    }

    Ok(())
}
