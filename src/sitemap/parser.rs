//! Sitemap document fetching and `<loc>` extraction

use crate::crawler::is_loaded;
use crate::{SitemapError, SitemapResult};
use reqwest::Client;

/// Namespace of the sitemaps.org 0.9 protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Fetches one sitemap document and returns its page locations
///
/// The response body is always read to the end before the status is
/// inspected, so the connection is released whatever the outcome.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - `<loc>` values in document order
/// * `Err(SitemapError::Fetch)` - Transport failure or timeout
/// * `Err(SitemapError::Status)` - Final HTTP status of 400 or above
/// * `Err(SitemapError::Parse)` - Body is not a well-formed sitemap
pub async fn fetch_sitemap(client: &Client, url: &str) -> SitemapResult<Vec<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| SitemapError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| SitemapError::Fetch {
            url: url.to_string(),
            source,
        })?;

    if !is_loaded(status) {
        return Err(SitemapError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = std::str::from_utf8(&body).map_err(|e| SitemapError::Parse {
        url: url.to_string(),
        message: format!("unsupported encoding, sitemaps must be UTF-8 ({})", e),
    })?;

    parse_sitemap(url, text)
}

/// Extracts every `<loc>` value from a sitemap body
///
/// `<loc>` elements are matched anywhere in the tree, either in the sitemap
/// namespace or with no namespace at all. Elements from extension namespaces
/// (image, video, news) are ignored. Values are trimmed and empty ones skipped.
pub fn parse_sitemap(url: &str, body: &str) -> SitemapResult<Vec<String>> {
    let document = roxmltree::Document::parse(body).map_err(|e| SitemapError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let locations = document
        .descendants()
        .filter(|node| node.is_element() && is_sitemap_loc(node.tag_name()))
        .filter_map(|node| {
            let text: String = node
                .descendants()
                .filter(|child| child.is_text())
                .filter_map(|child| child.text())
                .collect();
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect();

    Ok(locations)
}

fn is_sitemap_loc(name: roxmltree::ExpandedName<'_, '_>) -> bool {
    name.name() == "loc" && matches!(name.namespace(), None | Some(SITEMAP_NAMESPACE))
}
