//! Single-slot on-disk cache of the last scrape.
//!
//! The cache is one JSON file holding one snapshot:
//!
//! ```text
//! {
//!   "updatedAt": "2025-05-06T10:00:00.000Z",
//!   "items": [ { "title": "...", ... } ]
//! }
//! ```
//!
//! Older files stored `"titles": ["..."]` instead of `items`; those are still
//! read and turned into title-only records. A missing, unreadable, or
//! malformed file reads as "no cache". Staleness is decided by comparing
//! `updatedAt` against the TTL; nothing is ever evicted.
//!
//! Writes replace the file atomically (temp file + rename), so a reader never
//! sees a half-written snapshot.

use crate::error::CacheError;
use crate::models::{CacheEntry, NewsRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

/// How long a snapshot is served before a rescrape.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache file location relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "data/scraped-news.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheFileOut<'a> {
    updated_at: String,
    items: &'a [NewsRecord],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFileIn {
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    items: Option<Vec<NewsRecord>>,
    #[serde(default)]
    titles: Option<Vec<String>>,
}

impl CacheFileIn {
    fn into_entry(self) -> Result<CacheEntry, CacheError> {
        let fetched_at = self
            .updated_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .ok_or(CacheError::MissingTimestamp)?;

        let records: Vec<NewsRecord> = match (self.items, self.titles) {
            (Some(items), _) => items
                .into_iter()
                .filter(|r| !r.title.trim().is_empty())
                .collect(),
            (None, Some(titles)) => titles
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .map(NewsRecord::titled)
                .collect(),
            (None, None) => Vec::new(),
        };
        if records.is_empty() {
            return Err(CacheError::Empty);
        }

        Ok(CacheEntry {
            records,
            fetched_at,
        })
    }
}

/// Format a timestamp the way the cache file and API responses carry it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether `entry` is younger than `ttl` right now.
pub fn is_fresh(entry: &CacheEntry, ttl: Duration) -> bool {
    is_fresh_at(entry, ttl, Utc::now())
}

/// Whether `entry` is younger than `ttl` at `now`.
pub fn is_fresh_at(entry: &CacheEntry, ttl: Duration, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(entry.fetched_at);
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => age < ttl,
        // A TTL too large for chrono never expires.
        Err(_) => true,
    }
}

/// The file-backed cache slot.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current snapshot. Any failure reads as `None`.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub async fn read(&self) -> Option<CacheEntry> {
        match self.try_read().await {
            Ok(entry) => {
                debug!(count = entry.records.len(), fetched_at = %entry.fetched_at, "Cache hit");
                Some(entry)
            }
            Err(CacheError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file yet");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unusable cache file");
                None
            }
        }
    }

    async fn try_read(&self) -> Result<CacheEntry, CacheError> {
        let raw = fs::read_to_string(&self.path).await?;
        let parsed: CacheFileIn = serde_json::from_str(&raw)?;
        parsed.into_entry()
    }

    /// Replace the snapshot with `entry`. Failures are logged, not returned.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = entry.records.len()))]
    pub async fn write(&self, entry: &CacheEntry) {
        match self.try_write(entry).await {
            Ok(()) => info!("Wrote cache file"),
            Err(e) => error!(error = %e, "Failed to write cache file; serving uncached"),
        }
    }

    async fn try_write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let out = CacheFileOut {
            updated_at: format_timestamp(entry.fetched_at),
            items: &entry.records,
        };
        let json = serde_json::to_string_pretty(&out)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use tempfile::TempDir;

    fn record(title: &str) -> NewsRecord {
        NewsRecord {
            title: title.to_string(),
            url: Some(format!("https://www.bola.com/read/{}", title.len())),
            category: Some("Sepak Bola".to_string()),
            ..Default::default()
        }
    }

    fn store_in(dir: &TempDir) -> CacheStore {
        CacheStore::new(dir.path().join("data").join("scraped-news.json"))
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).read().await, None);
    }

    #[tokio::test]
    async fn test_write_then_read_is_fresh() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let entry = CacheEntry {
            records: vec![record("Arsenal Menang"), record("Chelsea Kalah")],
            fetched_at: Utc::now(),
        };

        store.write(&entry).await;
        let read = store.read().await.expect("cache should be readable");

        assert_eq!(read.records, entry.records);
        assert!(is_fresh(&read, CACHE_TTL));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_entry() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .write(&CacheEntry {
                records: vec![record("Lama")],
                fetched_at: Utc::now() - TimeDelta::hours(30),
            })
            .await;
        store
            .write(&CacheEntry {
                records: vec![record("Baru")],
                fetched_at: Utc::now(),
            })
            .await;

        let read = store.read().await.unwrap();
        assert_eq!(read.records.len(), 1);
        assert_eq!(read.records[0].title, "Baru");
        assert!(is_fresh(&read, CACHE_TTL));
    }

    #[test]
    fn test_freshness_expires_after_ttl() {
        let fetched_at = Utc::now();
        let entry = CacheEntry {
            records: vec![record("Apa Saja")],
            fetched_at,
        };

        assert!(is_fresh_at(&entry, CACHE_TTL, fetched_at));
        assert!(is_fresh_at(&entry, CACHE_TTL, fetched_at + TimeDelta::hours(23)));
        assert!(!is_fresh_at(&entry, CACHE_TTL, fetched_at + TimeDelta::hours(24)));
        assert!(!is_fresh_at(&entry, CACHE_TTL, fetched_at + TimeDelta::days(3)));
    }

    #[tokio::test]
    async fn test_reads_legacy_titles_shape() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"updatedAt": "2025-05-06T10:00:00.000Z", "titles": ["Satu", "", "Dua"]}"#,
        )
        .unwrap();

        let entry = store.read().await.unwrap();
        let titles: Vec<_> = entry.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Satu", "Dua"]);
        assert_eq!(entry.records[0].url, None);
        assert_eq!(format_timestamp(entry.fetched_at), "2025-05-06T10:00:00.000Z");
    }

    #[tokio::test]
    async fn test_corrupt_or_incomplete_files_read_as_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        for body in [
            "{ not json",
            r#"{"items": [{"title": "Tanpa Waktu"}]}"#,
            r#"{"updatedAt": "kemarin", "items": [{"title": "X"}]}"#,
            r#"{"updatedAt": "2025-05-06T10:00:00Z", "items": []}"#,
            r#"{"updatedAt": "2025-05-06T10:00:00Z"}"#,
        ] {
            std::fs::write(store.path(), body).unwrap();
            assert_eq!(store.read().await, None, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_written_file_uses_items_shape() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .write(&CacheEntry {
                records: vec![record("Bentuk Baru")],
                fetched_at: Utc::now(),
            })
            .await;

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["updatedAt"].is_string());
        assert_eq!(value["items"][0]["title"], "Bentuk Baru");
        assert!(value.get("titles").is_none());
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        // The cache "directory" is a regular file, so create_dir_all fails.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = CacheStore::new(blocker.join("scraped-news.json"));

        store
            .write(&CacheEntry {
                records: vec![record("Gagal Simpan")],
                fetched_at: Utc::now(),
            })
            .await;
        assert_eq!(store.read().await, None);
    }
}
