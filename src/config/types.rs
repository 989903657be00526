use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default number of concurrent fetch workers
pub const DEFAULT_WORKERS: usize = 3;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Cache-Preload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Sitemap documents to discover page URLs from, in order
    #[serde(default)]
    pub sitemaps: Vec<String>,

    #[serde(default)]
    pub preload: PreloadConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Worker pool behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadConfig {
    /// Number of concurrent fetch workers in the first pass
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-request timeout (seconds), shared by sitemap, first-pass and retry fetches
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request; the crate name and version when unset
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Headers added to every request
    ///
    /// A configured table is layered over the defaults, so `Connection: close`
    /// stays unless `Connection` is set explicitly (in any letter case).
    #[serde(default = "default_headers", deserialize_with = "deserialize_headers")]
    pub headers: BTreeMap<String, String>,
}

impl PreloadConfig {
    /// Returns the per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            headers: default_headers(),
        }
    }
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Asks the peer to close the connection after every response
fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Connection".to_string(), "close".to_string())])
}

/// Layers configured headers over the default set
///
/// Header names are case-insensitive, so a configured `connection` replaces
/// the default `Connection` entry instead of sitting next to it.
fn merge_with_default_headers(
    configured: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = default_headers()
        .into_iter()
        .filter(|(name, _)| !configured.keys().any(|key| key.eq_ignore_ascii_case(name)))
        .collect();
    headers.extend(configured);
    headers
}

fn deserialize_headers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, String>::deserialize(deserializer).map(merge_with_default_headers)
}
