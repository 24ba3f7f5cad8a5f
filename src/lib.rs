//! # bola_news
//!
//! Scrapes the bola.com news listing into structured records and keeps the
//! result in a single-slot JSON cache with a 24 hour TTL.
//!
//! ## Architecture
//!
//! 1. **Scraping** ([`scrapers`]): fetch the listing page, walk title markers,
//!    fill fields through ordered fallback chains
//! 2. **Caching** ([`cache`]): persist the last scrape, serve it while fresh
//! 3. **Serving** ([`service`], [`server`]): cache first, scrape on miss, never
//!    fail the caller

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod server;
pub mod service;
pub mod utils;
