//! Error types for the scrape and cache layers.
//!
//! Only [`FetchError`] ever leaves the orchestrator. [`EnrichmentError`] and
//! [`CacheError`] are logged and swallowed where they occur; they exist so the
//! failure sites can use `?` and still produce a useful log line.

use thiserror::Error;

/// The listing page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid listing url {0}")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Classify a reqwest failure for `url`, pulling timeouts and bad statuses out.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// A secondary article fetch failed. Never surfaces past the enricher.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("article fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("article responded with HTTP {0}")]
    Status(u16),
}

/// Reading or writing the cache file failed.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cache file has no usable updatedAt")]
    MissingTimestamp,

    #[error("cache file holds no records")]
    Empty,
}
