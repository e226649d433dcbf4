//! HTTP routes.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/stock/{symbol}` | Daily closing prices for an allow-listed symbol |
//! | GET | `/api/usage` | Provider call counts per day |
//! | GET | `/health` | Liveness and gate status |

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use quotegate_core::{StockPipeline, UsageSnapshot, UtcDateTime};
use serde::Serialize;
use time::OffsetDateTime;
use tokio::time::Instant;
use tower_http::trace::TraceLayer;

use crate::envelope::{Envelope, StockData};
use crate::error::ApiError;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: StockPipeline,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pipeline: StockPipeline) -> Self {
        Self {
            pipeline,
            started_at: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stock/:symbol", get(get_stock))
        .route("/api/usage", get(get_usage))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Envelope<StockData>>, ApiError> {
    let pipeline = state.pipeline.clone();

    // Runs detached: a client disconnect must not abort the gate wait or the
    // fetch, whose result still lands in the cache.
    let result = tokio::spawn(async move { pipeline.get_series(&symbol).await })
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

    Ok(Json(Envelope::success(StockData::from(result))))
}

async fn get_usage(State(state): State<AppState>) -> Result<Json<Envelope<UsageSnapshot>>, ApiError> {
    let snapshot = state.pipeline.usage_snapshot(OffsetDateTime::now_utc())?;
    Ok(Json(Envelope::success(snapshot)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
    uptime_secs: u64,
    rate_gate_ready: bool,
    cached_symbols: usize,
    timestamp: UtcDateTime,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: state.pipeline.provider_name(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        rate_gate_ready: state.pipeline.rate_gate().is_ready(),
        cached_symbols: state.pipeline.cache().len().await,
        timestamp: UtcDateTime::now(),
    })
}
