//! JSON envelopes returned by every endpoint.

use quotegate_core::{ErrorKind, PriceSeries, SeriesResult, Symbol, UtcDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{"status": "success", "data": ..., "timestamp": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub data: T,
    pub timestamp: UtcDateTime,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data,
            timestamp: UtcDateTime::now(),
        }
    }
}

/// `{"status": "error", "error": ..., "kind": ..., "timestamp": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub status: Status,
    pub error: String,
    pub kind: &'static str,
    pub timestamp: UtcDateTime,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self::with_code(kind.as_str(), error)
    }

    pub fn with_code(kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error: error.into(),
            kind,
            timestamp: UtcDateTime::now(),
        }
    }
}

/// Payload of `GET /api/stock/{symbol}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    pub symbol: Symbol,
    pub closing_prices: PriceSeries,
    pub cached: bool,
    pub data_points: usize,
}

impl From<SeriesResult> for StockData {
    fn from(result: SeriesResult) -> Self {
        Self {
            symbol: result.symbol,
            data_points: result.series.len(),
            closing_prices: result.series,
            cached: result.cached,
        }
    }
}
