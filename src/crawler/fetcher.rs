//! HTTP fetcher implementation
//!
//! This module handles all page requests for the preload, including:
//! - Building the shared HTTP client (timeout, default headers, user agent)
//! - Single GET fetches that drain the body and report a `FetchOutcome`
//! - Error classification into readable status strings

use crate::config::HttpConfig;
use crate::PreloadError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};

/// Status recorded for a single fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The server answered with this HTTP status code
    Http(u16),

    /// Transport failure, timeout, or body read error
    Error(String),
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Http(code) => write!(f, "{}", code),
            FetchStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Result of fetching one page
///
/// Failures are ordinary values here. Nothing in the crawl loop turns a page
/// failure into an `Err`.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL that was requested
    pub url: String,

    /// HTTP status or error description
    pub status: FetchStatus,

    /// Whether the final status is below 400
    pub ok: bool,

    /// Time spent on the request, body included
    pub elapsed: Duration,
}

/// Whether a final response status counts as a loaded page
///
/// Redirects have already been followed by the client, so a 3xx seen here
/// (304, or a 300 without `Location`) still means the server answered.
pub fn is_loaded(status: StatusCode) -> bool {
    status.as_u16() < 400
}

/// Returns the user agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Builds an HTTP client with proper configuration
///
/// Idle connections are never pooled: together with the default
/// `Connection: close` header every fetch opens and releases its own
/// connection.
///
/// # Arguments
///
/// * `config` - Outbound header set and user agent
/// * `timeout` - Per-request timeout covering connect, headers and body
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(PreloadError)` - A header was invalid or the client failed to build
pub fn build_http_client(config: &HttpConfig, timeout: Duration) -> Result<Client, PreloadError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| PreloadError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| PreloadError::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(default_user_agent);

    let client = Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a page once and reports the outcome
///
/// The body is read to completion on success so the response is fully
/// consumed before the connection is dropped. Any failure along the way
/// (connect, timeout, body read) yields `ok = false` with a description.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let started = Instant::now();

    let (status, ok) = match client.get(url).send().await {
        Ok(response) => {
            let code = response.status();
            match response.bytes().await {
                Ok(_) => (FetchStatus::Http(code.as_u16()), is_loaded(code)),
                Err(e) => (FetchStatus::Error(describe_error(&e)), false),
            }
        }
        Err(e) => (FetchStatus::Error(describe_error(&e)), false),
    };

    FetchOutcome {
        url: url.to_string(),
        status,
        ok,
        elapsed: started.elapsed(),
    }
}

/// Turns a reqwest error into a short status string
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out ({})", error)
    } else if error.is_connect() {
        format!("connection failed ({})", error)
    } else {
        error.to_string()
    }
}
