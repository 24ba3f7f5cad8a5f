//! HTTP transport for the news service.
//!
//! | Route | Method | Behaviour |
//! |-------|--------|-----------|
//! | `/api/scraped-news` | GET | Cached news; `?refresh=1` forces a scrape. Always 200. |
//! | `/api/scrape-bola` | GET, POST | Forced refresh; 500 if the listing fetch fails. |

use crate::models::NewsPayload;
use crate::service::{NewsService, REFRESH_LIMIT};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<NewsService>,
    /// Deadline for one `get_news` call; partial work is dropped on expiry.
    request_timeout: Duration,
}

impl AppState {
    pub fn new(service: Arc<NewsService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct NewsQuery {
    refresh: Option<String>,
}

impl NewsQuery {
    fn force_refresh(&self) -> bool {
        matches!(
            self.refresh.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/scraped-news", get(scraped_news))
        .route("/api/scrape-bola", get(scrape_bola).post(scrape_bola))
        .with_state(state)
}

#[instrument(level = "info", skip_all)]
async fn scraped_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Json<NewsPayload> {
    let force_refresh = query.force_refresh();
    let work = state.service.get_news(force_refresh, REFRESH_LIMIT);
    match tokio::time::timeout(state.request_timeout, work).await {
        Ok(payload) => Json(payload),
        Err(_) => {
            warn!(timeout = ?state.request_timeout, "get_news timed out; discarding partial result");
            Json(NewsPayload::failed(format!(
                "timeout after {:?} serving news",
                state.request_timeout
            )))
        }
    }
}

#[instrument(level = "info", skip_all)]
async fn scrape_bola(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.service.refresh(REFRESH_LIMIT).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "count": outcome.count })),
        ),
        Err(e) => {
            error!(error = %e, "Refresh via API failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Serving news API");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
