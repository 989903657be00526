//! Serial second pass over first-pass failures

use crate::crawler::fetcher::{fetch_page, FetchStatus};
use crate::output::StatusSink;
use crate::sitemap::deduplicate;
use reqwest::Client;

/// Outcome of the retry pass
#[derive(Debug, Clone, Default)]
pub struct RetryReport {
    /// Number of URLs fetched again
    pub attempted: usize,

    /// URLs that failed their second attempt as well
    pub still_failed: Vec<String>,
}

impl RetryReport {
    /// Number of URLs that succeeded on their second attempt
    pub fn recovered(&self) -> usize {
        self.attempted - self.still_failed.len()
    }
}

/// Fetches every failed URL once more, one at a time
///
/// Uses the same client as the first pass, so the same timeout and header
/// set apply. Skipped entirely when there is nothing to retry.
pub async fn retry_failures(
    client: &Client,
    failures: &[String],
    sink: &dyn StatusSink,
) -> RetryReport {
    if failures.is_empty() {
        sink.emit("");
        sink.emit("No failed pages in the first pass.");
        return RetryReport::default();
    }

    let unique = deduplicate(failures.to_vec());
    sink.emit("");
    sink.emit(&format!(
        "Retrying {} failed pages a second time...",
        unique.len()
    ));
    tracing::info!("Retry pass over {} pages", unique.len());

    let mut still_failed = Vec::new();
    for url in &unique {
        let outcome = fetch_page(client, url).await;

        match &outcome.status {
            FetchStatus::Http(code) => sink.emit(&format!("[RETRY] {} -> {}", url, code)),
            FetchStatus::Error(message) => {
                sink.emit(&format!("[RETRY] Error {}: {}", url, message))
            }
        }

        if !outcome.ok {
            tracing::warn!("Retry failed for {}: {}", url, outcome.status);
            still_failed.push(url.clone());
        }
    }

    RetryReport {
        attempted: unique.len(),
        still_failed,
    }
}
