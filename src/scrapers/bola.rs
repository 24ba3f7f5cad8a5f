//! bola.com listing scraper.
//!
//! Fetches the listing page once, hands the body to the record extractor and
//! returns whatever records it produced. A failed listing fetch is the only
//! error that leaves this module; everything after that point degrades
//! field by field instead of failing.

use crate::config::ScrapeConfig;
use crate::error::FetchError;
use crate::models::NewsRecord;
use crate::scrapers::enrich::{ArticleEnricher, EnrichQuota};
use crate::scrapers::extract::extract_records;
use crate::utils::truncate_for_log;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, info, instrument};
use url::Url;

/// Scrape orchestrator for the bola.com news listing.
#[derive(Debug, Clone)]
pub struct BolaScraper {
    client: Client,
    enricher: ArticleEnricher,
    config: ScrapeConfig,
    base: Url,
}

impl BolaScraper {
    /// Build a scraper. Fails only on an unparseable listing URL or a client
    /// that cannot be constructed.
    pub fn new(config: ScrapeConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.listing_url)
            .map_err(|_| FetchError::InvalidUrl(config.listing_url.clone()))?;
        let client = Client::builder()
            .timeout(config.listing_timeout)
            .build()
            .map_err(FetchError::Client)?;
        let enricher = ArticleEnricher::new(&config)?;
        Ok(Self {
            client,
            enricher,
            config,
            base,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrape up to `limit` records from the listing page, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the listing page cannot be fetched. Article
    /// enrichment failures never surface here.
    #[instrument(level = "info", skip(self), fields(listing = %self.config.listing_url))]
    pub async fn scrape(&self, limit: usize) -> Result<Vec<NewsRecord>, FetchError> {
        let html = self.fetch_listing().await?;
        info!(bytes = html.len(), "Fetched listing page");
        debug!(preview = %truncate_for_log(&html, 200), "Listing body");

        let cap = self.config.max_article_fetches;
        let quota = EnrichQuota::new(cap);
        let records = extract_records(
            &html,
            &self.base,
            limit,
            &self.enricher,
            &quota,
            self.config.enrich_concurrency,
        )
        .await;

        info!(
            count = records.len(),
            limit,
            article_fetches = cap - quota.remaining(),
            "Scraped listing records"
        );
        Ok(records)
    }

    async fn fetch_listing(&self) -> Result<String, FetchError> {
        let url = self.config.listing_url.as_str();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"<html><body><ul>
        <li class="articles--iridescent-list--text-item">
            <a href="/inggris/read/1"><h4 data-template-var="title">Chelsea Tahan Imbang</h4></a>
            <a class="articles--iridescent-list--text-item__category">Liga Inggris</a>
            <time datetime="2025-05-06T08:00:00+07:00">08.00</time>
        </li>
        <li class="articles--iridescent-list--text-item">
            <a href="/read/2"><h4 data-template-var="title">Verstappen Start Terdepan</h4></a>
        </li>
        <li class="articles--iridescent-list--text-item">
            <h4 data-template-var="title">Djokovic Lolos ke Final</h4>
        </li>
    </ul></body></html>"#;

    fn config_for(server: &MockServer) -> ScrapeConfig {
        ScrapeConfig {
            listing_url: format!("{}/", server.uri()),
            listing_timeout: Duration::from_millis(500),
            article_timeout: Duration::from_millis(500),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_scrape_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", crate::config::USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/read/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><meta property="article:section" content="Formula 1"></head></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let scraper = BolaScraper::new(config_for(&server)).unwrap();
        let records = scraper.scrape(20).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "Chelsea Tahan Imbang");
        assert_eq!(records[0].category.as_deref(), Some("Liga Inggris"));
        assert_eq!(
            records[0].url.as_deref(),
            Some(format!("{}/inggris/read/1", server.uri()).as_str())
        );
        assert_eq!(records[1].category.as_deref(), Some("Formula 1"));
        assert_eq!(records[2].url, None);
        assert_eq!(records[2].category.as_deref(), Some("Tenis"));
    }

    #[tokio::test]
    async fn test_scrape_honours_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let scraper = BolaScraper::new(config_for(&server)).unwrap();
        let records = scraper.scrape(1).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_article_fetches_capped_per_scrape() {
        let server = MockServer::start().await;
        let mut html = String::from("<html><body><ul>");
        for i in 0..60 {
            html.push_str(&format!(
                r#"<li><a href="/read/{i}"><span data-template-var="title">Artikel {i}</span></a></li>"#
            ));
        }
        html.push_str("</ul></body></html>");

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::path_regex(r"^/read/\d+$"))
            .respond_with(ResponseTemplate::new(500))
            .expect(40)
            .mount(&server)
            .await;

        let scraper = BolaScraper::new(config_for(&server)).unwrap();
        let records = scraper.scrape(200).await.unwrap();
        assert_eq!(records.len(), 60);
    }

    #[tokio::test]
    async fn test_listing_http_error_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let scraper = BolaScraper::new(config_for(&server)).unwrap();
        match scraper.scrape(20).await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_listing_timeout_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(LISTING)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let scraper = BolaScraper::new(config_for(&server)).unwrap();
        let err = scraper.scrape(20).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "got {err:?}");
    }

    #[test]
    fn test_invalid_listing_url() {
        let err = BolaScraper::new(ScrapeConfig::with_listing_url("not a url")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
