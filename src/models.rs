//! Data models for scraped news records and the payloads built from them.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`NewsRecord`]: One listing entry extracted from the news index page
//! - [`CacheEntry`]: The single persisted snapshot of the last scrape
//! - [`NewsPayload`]: What the serving entry point hands back to callers
//! - [`RefreshOutcome`]: Result of a forced, persisted refresh
//!
//! The JSON field names use camelCase to match the files and responses the
//! dashboard already consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news entry scraped from the listing page.
///
/// Only `title` is guaranteed. Every other field is best-effort and may be
/// absent when the markup around the title marker does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    /// Trimmed text of the title marker. Never empty.
    pub title: String,
    /// First paragraph near the title, at most 200 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Absolute article URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `datetime` attribute of the nearest `<time>` element, verbatim.
    #[serde(default, alias = "datetime", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Absolute URL of a representative image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Topical category, taken from markup or inferred from the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewsRecord {
    /// A record carrying nothing but a title (legacy cache files only stored titles).
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// The persisted result of the last successful scrape.
///
/// There is exactly one of these on disk at a time; a new write replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub records: Vec<NewsRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// Response of the serving entry point.
///
/// Serialized as `{items, updatedAt, fromCache, error?}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPayload {
    pub items: Vec<NewsRecord>,
    pub updated_at: Option<String>,
    #[serde(rename = "fromCache")]
    pub served_from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NewsPayload {
    /// An empty, non-cached payload explaining why nothing could be served.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// Outcome of a forced refresh that was persisted to the cache.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub count: usize,
    pub fetched_at: DateTime<Utc>,
}
