//! bola.com scraping pipeline.
//!
//! Data flows one way:
//!
//! ```text
//! bola (fetch listing) -> extract (per title marker) -> enrich / category -> Vec<NewsRecord>
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`bola`] | Fetches the listing page and drives extraction |
//! | [`extract`] | Turns title markers into records with fallback chains |
//! | [`enrich`] | Reads a category off the article page, within a per-scrape quota |
//! | [`category`] | Keyword table used when everything else fails |

pub mod bola;
pub mod category;
pub mod enrich;
pub mod extract;
