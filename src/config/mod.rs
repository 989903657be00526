//! Configuration module for Cache-Preload
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use cache_preload::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("preload.toml")).unwrap();
//! println!("Preloading from {} sitemaps", config.sitemaps.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, PreloadConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};

// Re-export parser and validation functions
pub use parser::{compute_content_hash, load_config, parse_config};
pub use validation::{validate, MAX_WORKERS};
