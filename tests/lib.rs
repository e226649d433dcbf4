//! Shared fixtures for the quotegate behavior suites: canned Alpha Vantage
//! bodies and a scripted transport that records call timing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quotegate_core::{
    AlphaVantageClient, HttpClient, HttpError, HttpRequest, HttpResponse, StockPipeline,
};
use tokio::time::Instant;

pub const AAPL_THREE_DAYS: &str = r#"{
    "Meta Data": {
        "1. Information": "Daily Prices (open, high, low, close) and Volumes",
        "2. Symbol": "AAPL"
    },
    "Time Series (Daily)": {
        "2024-01-04": {"1. open": "182.1500", "4. close": "184.9", "5. volume": "71983570"},
        "2024-01-03": {"1. open": "184.2200", "4. close": "186.2", "5. volume": "58414460"},
        "2024-01-02": {"1. open": "187.1500", "4. close": "185.6", "5. volume": "82488674"}
    }
}"#;

pub const THROTTLE_NOTICE: &str = r#"{
    "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day."
}"#;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub symbol: String,
    pub started_at: Instant,
    pub finished_at: Instant,
}

/// Replies with a canned body per symbol after a simulated latency.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    bodies: HashMap<String, String>,
    fallback: Option<String>,
    latency: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, symbol: &str, body: &str) -> Self {
        self.bodies.insert(symbol.to_owned(), body.to_owned());
        self
    }

    pub fn with_fallback(mut self, body: &str) -> Self {
        self.fallback = Some(body.to_owned());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("call log should not be poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let started_at = Instant::now();
            let symbol = request.query_param("symbol").unwrap_or_default().to_owned();
            tokio::time::sleep(self.latency).await;

            self.calls
                .lock()
                .expect("call log should not be poisoned")
                .push(RecordedCall {
                    symbol: symbol.clone(),
                    started_at,
                    finished_at: Instant::now(),
                });

            self.bodies
                .get(&symbol)
                .or(self.fallback.as_ref())
                .map(|body| HttpResponse::ok_json(body.clone()))
                .ok_or_else(|| HttpError::new(format!("no scripted body for {symbol}")))
        })
    }
}

pub fn pipeline_over(http: Arc<ScriptedHttpClient>) -> StockPipeline {
    StockPipeline::new(Arc::new(AlphaVantageClient::new(http, "test-key")))
}

pub fn series_body(entries: &[(&str, &str)]) -> String {
    let entries = entries
        .iter()
        .map(|(date, close)| format!(r#""{date}": {{"4. close": "{close}"}}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"Time Series (Daily)": {{{entries}}}}}"#)
}
