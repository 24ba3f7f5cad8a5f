//! Article page enrichment.
//!
//! When the listing markup carries no category for an entry, the article page
//! itself usually does: a category link, a breadcrumb, or a `section` meta
//! tag. [`ArticleEnricher`] fetches the page and looks for those. It knows
//! nothing about the per-scrape budget; that lives in [`EnrichQuota`], which
//! the extractor consults before every call.

use crate::config::ScrapeConfig;
use crate::error::{EnrichmentError, FetchError};
use crate::utils::non_empty;
use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, instrument};

static ARTICLE_CATEGORY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"[data-template-var="category"], a[data-template-var="category"], .articles--iridescent-list--text-item__category, .breadcrumb a, .breadcrumbs a, .meta__category a, .article__category a"#,
    )
    .unwrap()
});

static META_SECTION: Lazy<[Selector; 3]> = Lazy::new(|| {
    [
        Selector::parse(r#"meta[name="section"]"#).unwrap(),
        Selector::parse(r#"meta[property="article:section"]"#).unwrap(),
        Selector::parse(r#"meta[name="category"]"#).unwrap(),
    ]
});

/// Fetches article pages and pulls a category out of them.
#[derive(Debug, Clone)]
pub struct ArticleEnricher {
    client: Client,
    user_agent: String,
}

impl ArticleEnricher {
    /// Build an enricher with its own client using the article timeout.
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.article_timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Fetch `url` and return its category, or `None` on any failure.
    #[instrument(level = "debug", skip(self))]
    pub async fn enrich_category(&self, url: &str) -> Option<String> {
        match self.fetch_article(url).await {
            Ok(html) => {
                let category = category_from_article(&html);
                debug!(?category, "Article enrichment finished");
                category
            }
            Err(e) => {
                debug!(error = %e, "Article enrichment failed; falling back");
                None
            }
        }
    }

    async fn fetch_article(&self, url: &str) -> Result<String, EnrichmentError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Search an article page for its category.
///
/// Category links and breadcrumbs are tried first (the first match in
/// document order, if its text is non-empty), then the `section`,
/// `article:section` and `category` meta tags in that order.
pub fn category_from_article(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let from_markup = document
        .select(&ARTICLE_CATEGORY)
        .next()
        .and_then(|el| non_empty(el.text().collect::<String>()));

    from_markup.or_else(|| {
        META_SECTION.iter().find_map(|selector| {
            document
                .select(selector)
                .next()
                .and_then(|meta| meta.value().attr("content"))
                .and_then(non_empty)
        })
    })
}

/// Per-scrape budget of article fetches.
///
/// Shared by every enrichment task of one scrape. A slot is consumed before
/// the fetch starts, whether or not the fetch succeeds.
#[derive(Debug)]
pub struct EnrichQuota {
    remaining: AtomicUsize,
}

impl EnrichQuota {
    pub fn new(cap: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(cap),
        }
    }

    /// Take one slot. Returns `false` once the budget is spent.
    pub fn try_acquire(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}
