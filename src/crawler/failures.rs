//! Collection of URLs that failed their first fetch

use crate::sitemap::deduplicate;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Append-only, thread-safe list of failed URLs
///
/// Workers append concurrently during the first pass; the retry pass reads a
/// deduplicated copy once the pool has drained.
#[derive(Debug, Default)]
pub struct FailureSet {
    urls: Mutex<Vec<String>>,
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failed URL
    pub fn record(&self, url: &str) {
        self.lock_urls().push(url.to_string());
    }

    /// Returns each failed URL once
    pub fn unique(&self) -> Vec<String> {
        deduplicate(self.lock_urls().clone())
    }

    fn lock_urls(&self) -> MutexGuard<'_, Vec<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
