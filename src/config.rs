//! Runtime configuration for the scraper.

use std::time::Duration;

/// Listing page scraped when nothing else is configured.
pub const DEFAULT_LISTING_URL: &str = "https://www.bola.com/";

/// User agent sent with every request, listing and article alike.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; DendiBot/1.0)";

/// Upper bound on secondary article fetches per scrape.
pub const MAX_ARTICLE_FETCHES: usize = 40;

/// Scrape settings.
///
/// The timeouts are fixed in production; tests shrink them to keep wiremock
/// delay scenarios quick.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Listing page URL. Its origin is also the base for relative links.
    pub listing_url: String,
    pub user_agent: String,
    /// Timeout for the listing fetch (10s).
    pub listing_timeout: Duration,
    /// Timeout for each article enrichment fetch (8s).
    pub article_timeout: Duration,
    /// Enrichment quota per scrape.
    pub max_article_fetches: usize,
    /// How many enrichment fetches may be in flight at once.
    pub enrich_concurrency: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            listing_timeout: Duration::from_secs(10),
            article_timeout: Duration::from_secs(8),
            max_article_fetches: MAX_ARTICLE_FETCHES,
            enrich_concurrency: 8,
        }
    }
}

impl ScrapeConfig {
    /// Default settings pointed at a different listing page.
    pub fn with_listing_url(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            ..Default::default()
        }
    }
}
