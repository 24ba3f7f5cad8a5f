//! Listing page record extraction.
//!
//! Every listing entry on bola.com starts with a title marker
//! (`[data-template-var="title"]`). From each marker we walk outwards to a
//! structural container and collect the other fields with ordered fallback
//! chains: the first strategy producing a non-empty value wins, and a field
//! that no strategy finds is simply left out.
//!
//! Extraction runs in two phases because [`Html`] is not `Send` and must not
//! live across an await point:
//!
//! 1. [`extract`] walks the parsed document synchronously and produces
//!    [`ListingEntry`] values carrying everything the listing markup itself
//!    offers.
//! 2. [`finish`] fills missing categories, first from the article page
//!    (bounded by the shared [`EnrichQuota`]), then from title keywords.

use crate::models::NewsRecord;
use crate::scrapers::category;
use crate::scrapers::enrich::{ArticleEnricher, EnrichQuota};
use crate::utils::{non_empty, resolve_url, truncate_chars};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

/// Snippets longer than this are cut.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Lazy-loading attributes first; `src` is often a placeholder.
const IMG_SRC_ATTRS: [&str; 4] = ["data-src", "data-original", "data-lazy-src", "src"];

/// Source attributes read off a non-`img` image marker.
const MARKER_SRC_ATTRS: [&str; 3] = ["data-src", "data-image", "src"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static TITLE_MARKER: Lazy<Selector> = Lazy::new(|| selector(r#"[data-template-var="title"]"#));
static CONTAINER: Lazy<Selector> = Lazy::new(|| {
    selector("article, .article, .media, .grid-item, .list-content, .card, li, .text-item")
});
static MEDIA_ANCESTOR: Lazy<Selector> =
    Lazy::new(|| selector("article, .article, .media, .grid-item"));
static WRAPPER: Lazy<Selector> = Lazy::new(|| {
    selector("li, .articles--iridescent-list--text-item, .list-item, article, .grid-item")
});
static CATEGORY: Lazy<Selector> = Lazy::new(|| {
    selector(
        r#"[data-template-var="category"], a[data-template-var="category"], .articles--iridescent-list--text-item__category, a[class*="category"], .meta__category a, .article__category a"#,
    )
});
static IMAGE_MARKER: Lazy<Selector> = Lazy::new(|| selector(r#"[data-template-var="image"]"#));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time[datetime]"));
static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));

static BACKGROUND_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)background-image:\s*url\(["']?(.*?)["']?\)"#).unwrap());

/// A listing entry as found in the listing markup alone.
///
/// `record.category` is only set when one of the structural strategies found
/// it; [`finish`] takes care of the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    pub record: NewsRecord,
}

impl ListingEntry {
    /// Whether an article fetch could still contribute a category.
    pub fn wants_enrichment(&self) -> bool {
        self.record.category.is_none() && self.record.url.is_some()
    }
}

/// Nearest element matching `sel`, starting with `el` itself.
fn closest<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| sel.matches(candidate))
}

fn parent(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Text of the first `sel` match under `scope`, if non-empty.
fn first_text(scope: Option<ElementRef<'_>>, sel: &Selector) -> Option<String> {
    scope?.select(sel).next().and_then(|el| non_empty(text_of(el)))
}

fn datetime_in(scope: Option<ElementRef<'_>>) -> Option<String> {
    scope?
        .select(&TIME)
        .next()
        .and_then(|time| time.value().attr("datetime"))
        .and_then(non_empty)
}

fn first_attr<'a>(el: ElementRef<'a>, attrs: &[&str]) -> Option<&'a str> {
    attrs
        .iter()
        .filter_map(|name| el.value().attr(name))
        .find(|value| !value.trim().is_empty())
}

fn background_image(el: ElementRef<'_>) -> Option<&str> {
    let style = el.value().attr("style")?;
    BACKGROUND_IMAGE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|src| !src.is_empty())
}

/// Image from the dedicated image marker inside `container`.
fn marker_image(container: ElementRef<'_>, base: &Url) -> Option<String> {
    let marker = container.select(&IMAGE_MARKER).next()?;
    let src = if marker.value().name() == "img" {
        first_attr(marker, &IMG_SRC_ATTRS)
    } else if let Some(inner) = marker.select(&IMG).next() {
        first_attr(inner, &IMG_SRC_ATTRS)
    } else {
        first_attr(marker, &MARKER_SRC_ATTRS).or_else(|| background_image(marker))
    };
    resolve_url(src, base)
}

fn first_img(container: ElementRef<'_>, base: &Url) -> Option<String> {
    let img = container.select(&IMG).next()?;
    resolve_url(first_attr(img, &IMG_SRC_ATTRS), base)
}

fn entry_for(marker: ElementRef<'_>, title: String, base: &Url) -> ListingEntry {
    let container = closest(marker, &CONTAINER);
    let url = closest(marker, &ANCHOR).and_then(|a| resolve_url(a.value().attr("href"), base));

    let snippet = first_text(container, &PARAGRAPH).map(|p| truncate_chars(&p, SNIPPET_MAX_CHARS));

    let published_at = datetime_in(container)
        .or_else(|| datetime_in(closest(marker, &MEDIA_ANCESTOR)))
        .or_else(|| datetime_in(parent(marker)));

    let category = first_text(container, &CATEGORY)
        .or_else(|| first_text(closest(marker, &WRAPPER), &CATEGORY))
        .or_else(|| first_text(parent(marker), &CATEGORY));

    let image = container.and_then(|c| marker_image(c, base).or_else(|| first_img(c, base)));

    ListingEntry {
        record: NewsRecord {
            title,
            snippet,
            url,
            published_at,
            image,
            category,
        },
    }
}

/// Walk title markers in document order and build up to `limit` entries.
///
/// Markers whose text is blank are skipped and do not count toward the limit.
pub fn extract(page: &Html, base: &Url, limit: usize) -> Vec<ListingEntry> {
    let mut entries = Vec::new();
    for marker in page.select(&TITLE_MARKER) {
        if entries.len() >= limit {
            break;
        }
        let Some(title) = non_empty(text_of(marker)) else {
            continue;
        };
        entries.push(entry_for(marker, title, base));
    }
    debug!(count = entries.len(), limit, "Extracted listing entries");
    entries
}

/// Fill in categories the listing markup did not provide.
///
/// Entries with a URL take a slot from `quota` and ask the article page;
/// the slot is spent even when the fetch fails. Anything still missing a
/// category falls back to title keywords. Output order equals input order.
#[instrument(level = "debug", skip_all, fields(entries = entries.len()))]
pub async fn finish(
    entries: Vec<ListingEntry>,
    enricher: &ArticleEnricher,
    quota: &EnrichQuota,
    concurrency: usize,
) -> Vec<NewsRecord> {
    stream::iter(entries)
        .map(move |entry| async move {
            let wants_enrichment = entry.wants_enrichment();
            let mut record = entry.record;
            if wants_enrichment && quota.try_acquire() {
                if let Some(url) = record.url.as_deref() {
                    record.category = enricher.enrich_category(url).await.and_then(non_empty);
                }
            }
            if record.category.is_none() {
                record.category = category::infer(Some(&record.title));
            }
            record
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Parse `html` and run both extraction phases.
pub async fn extract_records(
    html: &str,
    base: &Url,
    limit: usize,
    enricher: &ArticleEnricher,
    quota: &EnrichQuota,
    concurrency: usize,
) -> Vec<NewsRecord> {
    let entries = {
        let page = Html::parse_document(html);
        extract(&page, base, limit)
    };
    finish(entries, enricher, quota, concurrency).await
}
