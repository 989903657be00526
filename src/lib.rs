//! Cache-Preload: a sitemap-driven cache warmer
//!
//! This crate discovers every page declared in a set of sitemap documents and
//! fetches each one once, so that a cache or CDN in front of the origin is
//! populated before real traffic arrives. Pages that fail are retried once in
//! a serial second pass.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;

use thiserror::Error;

/// Main error type for Cache-Preload operations
///
/// Only configuration and setup problems end up here. Individual page
/// failures are reported as [`crawler::FetchOutcome`] values instead.
#[derive(Debug, Error)]
pub enum PreloadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while retrieving or reading a single sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed sitemap {url}: {message}")]
    Parse { url: String, message: String },
}

/// Result type alias for Cache-Preload operations
pub type Result<T> = std::result::Result<T, PreloadError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_preload, FetchOutcome, FetchStatus, Preloader};
pub use output::{PreloadSummary, StatusSink};
