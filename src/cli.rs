//! Command-line interface definitions.
//!
//! Global options can also come from environment variables, which is how the
//! periodic refresh job is usually configured.

use crate::cache::DEFAULT_CACHE_FILE;
use crate::config::DEFAULT_LISTING_URL;
use crate::service::REFRESH_LIMIT;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Scrape bola.com news into a cached JSON feed.
///
/// # Examples
///
/// ```sh
/// # Print the feed, from cache when fresh
/// bola_news get
///
/// # Periodic job: always scrape and persist
/// bola_news refresh
///
/// # HTTP API on port 3000
/// bola_news serve --bind 0.0.0.0:3000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON cache file
    #[arg(long, global = true, env = "BOLA_CACHE_FILE", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Listing page to scrape
    #[arg(long, global = true, env = "BOLA_LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the news feed as JSON
    Get {
        /// Ignore a fresh cache and scrape now
        #[arg(short, long)]
        force_refresh: bool,

        /// Maximum number of records to scrape
        #[arg(short, long, default_value_t = REFRESH_LIMIT)]
        limit: usize,
    },

    /// Scrape and persist the cache; exits non-zero if the listing is unreachable
    Refresh,

    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Deadline for a single news request, in seconds
        #[arg(long, default_value_t = 60)]
        request_timeout_secs: u64,
    },
}
