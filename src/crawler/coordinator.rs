//! Preload coordinator - phase orchestration
//!
//! This module runs the phases of a preload in order:
//! - Discovering page URLs from the configured sitemaps
//! - Fetching every page once with the worker pool
//! - Retrying first-pass failures serially
//! - Building and printing the final summary

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pool::WorkerPool;
use crate::crawler::retry::retry_failures;
use crate::output::{print_summary, PreloadSummary, StatusSink, StdoutSink};
use crate::sitemap::collect_urls;
use crate::PreloadError;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;

/// Main preload coordinator structure
pub struct Preloader {
    config: Config,
    client: Client,
    sink: Arc<dyn StatusSink>,
}

impl Preloader {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    /// * `sink` - Where status lines are written
    ///
    /// # Returns
    ///
    /// * `Ok(Preloader)` - Ready to run
    /// * `Err(PreloadError)` - The HTTP client could not be built
    pub fn new(config: Config, sink: Arc<dyn StatusSink>) -> Result<Self, PreloadError> {
        let client = build_http_client(&config.http, config.preload.timeout())?;
        Ok(Self {
            config,
            client,
            sink,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs discovery, the first pass, the retry pass and the summary
    ///
    /// Page and sitemap failures are reported through the sink and reflected
    /// in the summary; they never make this return early.
    pub async fn run(&self) -> PreloadSummary {
        let started_at = Utc::now();
        tracing::info!(
            "Starting preload from {} sitemaps with {} workers",
            self.config.sitemaps.len(),
            self.config.preload.workers
        );

        let discovered =
            collect_urls(&self.client, &self.config.sitemaps, self.sink.as_ref()).await;
        let total = discovered.total();

        let pool = WorkerPool::new(
            self.client.clone(),
            self.config.preload.workers,
            self.sink.clone(),
        );
        let first_pass = pool.run(discovered.into_urls()).await;

        let retry = retry_failures(&self.client, &first_pass.failures, self.sink.as_ref()).await;
        if retry.attempted > 0 {
            tracing::info!(
                "Retry pass recovered {} of {} pages",
                retry.recovered(),
                retry.attempted
            );
        }

        let summary = PreloadSummary {
            started_at,
            finished_at: Utc::now(),
            total,
            processed: first_pass.processed,
            retried: retry.attempted,
            still_failed: retry.still_failed,
        };

        print_summary(&summary, self.sink.as_ref());
        tracing::info!(
            "Preload completed: {}/{} pages loaded in {}s",
            summary.success_count(),
            summary.total,
            summary.duration_seconds()
        );

        summary
    }
}

/// Runs a complete preload, writing status lines to stdout
///
/// # Example
///
/// ```no_run
/// use cache_preload::config::load_config;
/// use cache_preload::crawler::run_preload;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("preload.toml"))?;
/// let summary = run_preload(config).await?;
/// println!("{}", summary.tally_line());
/// # Ok(())
/// # }
/// ```
pub async fn run_preload(config: Config) -> Result<PreloadSummary, PreloadError> {
    let preloader = Preloader::new(config, Arc::new(StdoutSink))?;
    Ok(preloader.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use std::collections::BTreeMap;

    #[test]
    fn test_preloader_creation() {
        let config = Config {
            sitemaps: vec!["https://example.com/sitemap.xml".to_string()],
            ..Config::default()
        };
        let preloader = Preloader::new(config, Arc::new(MemorySink::new())).unwrap();
        assert_eq!(preloader.config().preload.workers, 3);
    }

    #[test]
    fn test_preloader_rejects_invalid_header() {
        let mut config = Config::default();
        config.http.headers = BTreeMap::from([("Bad Header".to_string(), "x".to_string())]);

        let result = Preloader::new(config, Arc::new(MemorySink::new()));
        assert!(matches!(result, Err(PreloadError::InvalidHeader { .. })));
    }

    #[tokio::test]
    async fn test_run_with_no_reachable_sitemaps_reports_zero_of_zero() {
        let config = Config {
            sitemaps: vec!["http://127.0.0.1:1/sitemap.xml".to_string()],
            ..Config::default()
        };
        let sink = Arc::new(MemorySink::new());
        let preloader = Preloader::new(config, sink.clone()).unwrap();

        let summary = preloader.run().await;

        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_count(), 0);
        let lines = sink.lines();
        assert!(lines.contains(&"No failed pages in the first pass.".to_string()));
        assert!(lines.contains(&"Successfully loaded 0 pages out of 0 total.".to_string()));
    }
}
