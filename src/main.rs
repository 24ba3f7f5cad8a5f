//! # bola_news
//!
//! Command-line entry point: print the feed, run the periodic refresh, or
//! serve the HTTP API.
//!
//! ## Usage
//!
//! ```sh
//! bola_news get --force-refresh
//! bola_news refresh
//! bola_news serve --bind 0.0.0.0:3000
//! ```

use bola_news::cache::CacheStore;
use bola_news::cli::{Cli, Command};
use bola_news::config::ScrapeConfig;
use bola_news::scrapers::bola::BolaScraper;
use bola_news::server::{self, AppState};
use bola_news::service::{NewsService, REFRESH_LIMIT};
use bola_news::utils::ensure_writable_dir;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so `get` output stays clean JSON) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let scraper = BolaScraper::new(ScrapeConfig::with_listing_url(args.listing_url.clone()))?;
    let service = NewsService::new(scraper, CacheStore::new(&args.cache_file));

    match args.command {
        Command::Get {
            force_refresh,
            limit,
        } => {
            let payload = service.get_news(force_refresh, limit).await;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Refresh => match service.refresh(REFRESH_LIMIT).await {
            Ok(outcome) => {
                info!(count = outcome.count, path = %args.cache_file.display(), "Cache refreshed");
            }
            Err(e) => {
                error!(error = %e, "Refresh failed");
                std::process::exit(1);
            }
        },
        Command::Serve {
            bind,
            request_timeout_secs,
        } => {
            // Early check; a read-only cache dir only costs us caching, not serving.
            if let Some(dir) = args.cache_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = ensure_writable_dir(dir).await {
                    warn!(path = %dir.display(), error = %e, "Cache directory is not writable");
                }
            }
            let state = AppState::new(
                Arc::new(service),
                Duration::from_secs(request_timeout_secs),
            );
            server::serve(bind, state).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
