//! Serving facade: cache first, scrape on miss.
//!
//! [`NewsService::get_news`] is what the HTTP route and the `get` command
//! call. It never fails; a scrape error turns into an empty payload with an
//! `error` string. [`NewsService::refresh`] is the periodic job: always
//! scrape, always persist, and report a listing fetch failure to the caller.

use crate::cache::{self, CACHE_TTL, CacheStore, format_timestamp};
use crate::error::FetchError;
use crate::models::{CacheEntry, NewsPayload, RefreshOutcome};
use crate::scrapers::bola::BolaScraper;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Record limit used by the serving routes and the periodic refresh.
pub const REFRESH_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct NewsService {
    scraper: BolaScraper,
    cache: CacheStore,
    ttl: Duration,
}

impl NewsService {
    pub fn new(scraper: BolaScraper, cache: CacheStore) -> Self {
        Self {
            scraper,
            cache,
            ttl: CACHE_TTL,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Serve news from a fresh cache, or scrape and cache.
    ///
    /// `force_refresh` skips the cache read entirely. An empty scrape is
    /// returned as-is and not cached.
    #[instrument(level = "info", skip(self))]
    pub async fn get_news(&self, force_refresh: bool, limit: usize) -> NewsPayload {
        if !force_refresh {
            match self.cache.read().await {
                Some(entry) if cache::is_fresh(&entry, self.ttl) => {
                    info!(count = entry.records.len(), "Serving news from cache");
                    return NewsPayload {
                        updated_at: Some(format_timestamp(entry.fetched_at)),
                        items: entry.records,
                        served_from_cache: true,
                        error: None,
                    };
                }
                Some(entry) => debug!(fetched_at = %entry.fetched_at, "Cache is stale"),
                None => debug!("Cache is empty"),
            }
        }

        let records = match self.scraper.scrape(limit).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Scrape failed; returning empty result");
                return NewsPayload::failed(e.to_string());
            }
        };
        if records.is_empty() {
            warn!(listing = %self.scraper.config().listing_url, "Scrape returned no records");
            return NewsPayload::default();
        }

        let entry = CacheEntry {
            records,
            fetched_at: Utc::now(),
        };
        self.cache.write(&entry).await;
        NewsPayload {
            updated_at: Some(format_timestamp(entry.fetched_at)),
            items: entry.records,
            served_from_cache: false,
            error: None,
        }
    }

    /// Force a scrape and persist the result, whatever its size.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] only when the listing page itself could not be
    /// fetched. A cache write failure is logged and does not fail the refresh.
    #[instrument(level = "info", skip(self))]
    pub async fn refresh(&self, limit: usize) -> Result<RefreshOutcome, FetchError> {
        let records = self.scraper.scrape(limit).await?;
        let entry = CacheEntry {
            records,
            fetched_at: Utc::now(),
        };
        self.cache.write(&entry).await;
        info!(count = entry.records.len(), "Refreshed news cache");
        Ok(RefreshOutcome {
            count: entry.records.len(),
            fetched_at: entry.fetched_at,
        })
    }
}
