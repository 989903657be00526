//! URL discovery across several sitemap sources

use crate::output::StatusSink;
use crate::sitemap::parser::fetch_sitemap;
use reqwest::Client;
use std::collections::BTreeSet;

/// The deduplicated set of page URLs produced by discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveredUrls {
    /// Unique page URLs
    urls: Vec<String>,

    /// Sitemap sources that could not be fetched or parsed
    failed_sources: Vec<String>,
}

impl DiscoveredUrls {
    /// Builds the set from raw `<loc>` values, dropping duplicates
    pub fn from_locations(locations: Vec<String>) -> Self {
        Self {
            urls: deduplicate(locations),
            failed_sources: Vec::new(),
        }
    }

    /// Total work count for the preload
    pub fn total(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn failed_sources(&self) -> &[String] {
        &self.failed_sources
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

/// Removes duplicate URLs; the resulting order carries no meaning
pub fn deduplicate(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Runs the sitemap parser over every source in order
///
/// A source that fails is reported and skipped; discovery always carries on
/// with the remaining sources. An empty result is not an error.
pub async fn collect_urls(
    client: &Client,
    sources: &[String],
    sink: &dyn StatusSink,
) -> DiscoveredUrls {
    let mut all_locations = Vec::new();
    let mut failed_sources = Vec::new();

    for source in sources {
        sink.emit(&format!("Parsing sitemap: {}", source));

        match fetch_sitemap(client, source).await {
            Ok(locations) => {
                tracing::debug!("Sitemap {} listed {} locations", source, locations.len());
                sink.emit(&format!("Found {} pages in {}", locations.len(), source));
                all_locations.extend(locations);
            }
            Err(e) => {
                tracing::warn!("Skipping sitemap {}: {}", source, e);
                sink.emit(&format!("Failed to parse {}: {}", source, e));
                failed_sources.push(source.clone());
            }
        }
    }

    let mut discovered = DiscoveredUrls::from_locations(all_locations);
    discovered.failed_sources = failed_sources;

    sink.emit(&format!("Total unique pages to visit: {}", discovered.total()));
    tracing::info!(
        "Discovered {} unique pages from {} sitemaps ({} failed)",
        discovered.total(),
        sources.len(),
        discovered.failed_sources.len()
    );

    discovered
}
