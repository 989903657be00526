//! Sitemap discovery
//!
//! This module turns a list of sitemap sources into the deduplicated set of
//! page URLs the preload works through:
//! - Fetching and parsing individual sitemap documents
//! - Aggregating results across sources, skipping sources that fail

mod aggregator;
mod parser;

pub use aggregator::{collect_urls, deduplicate, DiscoveredUrls};
pub use parser::{fetch_sitemap, parse_sitemap, SITEMAP_NAMESPACE};
