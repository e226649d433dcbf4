use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::QuoteProvider;
use crate::{PricePoint, PriceSeries, ProviderError, Symbol, TradingDate};

pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const TIME_SERIES_FIELD: &str = "Time Series (Daily)";
const CLOSE_FIELD: &str = "4. close";
const ADJUSTED_CLOSE_FIELD: &str = "5. adjusted close";

/// Alpha Vantage `TIME_SERIES_DAILY` client.
#[derive(Clone)]
pub struct AlphaVantageClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl AlphaVantageClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(ALPHAVANTAGE_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn daily_series_request(&self, symbol: &Symbol) -> HttpRequest {
        HttpRequest::get(format!("{}/query", self.base_url))
            .with_query("function", "TIME_SERIES_DAILY")
            .with_query("symbol", symbol.as_str())
            .with_query("outputsize", "full")
            .with_query("apikey", self.api_key.as_str())
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch(&self, symbol: &Symbol) -> Result<PriceSeries, ProviderError> {
        let request = self.daily_series_request(symbol);
        debug!(symbol = %symbol, url = %request.redacted_url(), "requesting daily series");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| ProviderError::Transport(format!("alphavantage: {}", e.message())))?;

        if !response.is_success() {
            return Err(ProviderError::Transport(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        let series = parse_daily_series(symbol, &response.body)?;
        debug!(symbol = %symbol, points = series.len(), "parsed daily series");
        Ok(series)
    }
}

impl QuoteProvider for AlphaVantageClient {
    fn name(&self) -> &'static str {
        "alphavantage"
    }

    fn fetch_daily_series<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>> {
        Box::pin(self.fetch(symbol))
    }
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    time_series: Option<BTreeMap<String, Value>>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
    #[serde(rename = "Information", default)]
    information: Option<String>,
    #[serde(rename = "Error Message", default)]
    error_message: Option<String>,
}

/// Turns a `TIME_SERIES_DAILY` body into an ascending [`PriceSeries`].
pub fn parse_daily_series(symbol: &Symbol, body: &str) -> Result<PriceSeries, ProviderError> {
    let response: DailySeriesResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedPayload(format!("alphavantage body: {e}")))?;

    let Some(entries) = response.time_series else {
        if let Some(notice) = response.note {
            warn!(symbol = %symbol, "alphavantage throttled the request");
            return Err(ProviderError::RateLimited { notice });
        }

        return Err(ProviderError::NotFound {
            symbol: symbol.as_str().to_owned(),
            message: response.information.or(response.error_message),
        });
    };

    let points = entries
        .iter()
        .enumerate()
        .map(|(index, (date, entry))| parse_entry(index, date, entry))
        .collect::<Result<Vec<_>, _>>()?;

    PriceSeries::new(points).map_err(|e| {
        ProviderError::MalformedPayload(format!("{TIME_SERIES_FIELD} for {symbol}: {e}"))
    })
}

fn parse_entry(index: usize, date: &str, entry: &Value) -> Result<PricePoint, ProviderError> {
    let malformed = |reason: String| ProviderError::MalformedEntry {
        index,
        date: date.to_owned(),
        reason,
    };

    let trading_date = TradingDate::parse(date).map_err(|e| malformed(e.to_string()))?;

    let raw_close = entry
        .get(CLOSE_FIELD)
        .or_else(|| entry.get(ADJUSTED_CLOSE_FIELD))
        .ok_or_else(|| {
            malformed(format!(
                "missing '{CLOSE_FIELD}' and '{ADJUSTED_CLOSE_FIELD}'"
            ))
        })?;

    let close = match raw_close {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
    .ok_or_else(|| malformed(format!("close price {raw_close} is not numeric")))?;

    PricePoint::new(trading_date, close).map_err(|e| malformed(e.to_string()))
}
