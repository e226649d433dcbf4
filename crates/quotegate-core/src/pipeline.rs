//! Validate, serve from cache, or fetch through the rate gate.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::adapters::AlphaVantageClient;
use crate::cache::QuoteCache;
use crate::config::GatewayConfig;
use crate::http_client::ReqwestHttpClient;
use crate::provider::QuoteProvider;
use crate::throttling::RateGate;
use crate::usage::{UsageSnapshot, UsageTracker};
use crate::validator::SymbolValidator;
use crate::{PipelineError, PriceSeries, Symbol, UsageError};

/// Outcome of [`StockPipeline::get_series`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesResult {
    pub symbol: Symbol,
    pub series: PriceSeries,
    pub cached: bool,
}

/// Orchestrates the stock-data endpoint.
///
/// Cloning is cheap and every clone shares the same cache, usage store and
/// rate gate.
#[derive(Clone)]
pub struct StockPipeline {
    validator: Arc<SymbolValidator>,
    cache: QuoteCache,
    usage: UsageTracker,
    gate: RateGate,
    provider: Arc<dyn QuoteProvider>,
}

impl StockPipeline {
    /// Pipeline with the default allow-list, one-hour cache and free-tier gate.
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            validator: Arc::new(SymbolValidator::default()),
            cache: QuoteCache::default(),
            usage: UsageTracker::default(),
            gate: RateGate::default(),
            provider,
        }
    }

    /// Wires an Alpha Vantage client over reqwest from `config`.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let client = AlphaVantageClient::new(Arc::new(ReqwestHttpClient::new()), &config.api_key)
            .with_base_url(&config.base_url)
            .with_timeout_ms(config.request_timeout.as_millis() as u64);

        let validator = match &config.allow_list {
            Some(symbols) => SymbolValidator::new(symbols),
            None => SymbolValidator::default(),
        };

        Self::new(Arc::new(client))
            .with_validator(validator)
            .with_cache(QuoteCache::new(config.cache_ttl))
            .with_usage_tracker(UsageTracker::new(config.usage_retention_days))
            .with_rate_gate(RateGate::new(config.rate_policy))
    }

    pub fn with_validator(mut self, validator: SymbolValidator) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn with_cache(mut self, cache: QuoteCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_usage_tracker(mut self, usage: UsageTracker) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_rate_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }

    /// Returns the closing-price history for `raw_symbol`.
    ///
    /// Cache hits skip usage tracking and the provider. Misses are recorded,
    /// wait for the rate gate and make exactly one provider call. Provider
    /// errors are returned as-is; nothing is retried here.
    pub async fn get_series(&self, raw_symbol: &str) -> Result<SeriesResult, PipelineError> {
        let symbol = self.validator.validate(raw_symbol).map_err(|error| {
            debug!(input = raw_symbol, %error, "rejected symbol");
            PipelineError::InvalidSymbol(error)
        })?;

        if let Some(series) = self.cache.get(&symbol).await {
            debug!(symbol = %symbol, points = series.len(), "cache hit");
            return Ok(SeriesResult {
                symbol,
                series,
                cached: true,
            });
        }

        debug!(symbol = %symbol, "cache miss");
        if let Err(error) = self.usage.record(&symbol, OffsetDateTime::now_utc()) {
            warn!(symbol = %symbol, %error, "usage tracking failed");
        }

        let fetched = {
            let _permit = self.gate.acquire().await;
            self.provider.fetch_daily_series(&symbol).await
        };

        let series = fetched.map_err(|error| {
            debug!(symbol = %symbol, provider = self.provider.name(), %error, "provider fetch failed");
            PipelineError::from(error)
        })?;

        self.cache.put(symbol.clone(), series.clone()).await;
        info!(symbol = %symbol, points = series.len(), "cached fresh series");

        Ok(SeriesResult {
            symbol,
            series,
            cached: false,
        })
    }

    pub fn usage_snapshot(&self, now: OffsetDateTime) -> Result<UsageSnapshot, UsageError> {
        self.usage.snapshot(now)
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    pub fn rate_gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn validator(&self) -> &SymbolValidator {
        &self.validator
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, PricePoint, ProviderError, TradingDate};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingProvider {
        calls: AtomicUsize,
        outcome: Result<PriceSeries, ProviderError>,
    }

    impl CountingProvider {
        fn returning(outcome: Result<PriceSeries, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                outcome,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl QuoteProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn fetch_daily_series<'a>(
            &'a self,
            _symbol: &'a Symbol,
        ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcome.clone();
            Box::pin(async move { outcome })
        }
    }

    fn sample_series() -> PriceSeries {
        let point = |date: &str, close: f64| {
            PricePoint::new(TradingDate::parse(date).expect("date"), close).expect("point")
        };
        PriceSeries::new(vec![point("2024-01-02", 185.6), point("2024-01-03", 186.2)])
            .expect("series")
    }

    fn total_usage(pipeline: &StockPipeline) -> u64 {
        pipeline
            .usage_snapshot(OffsetDateTime::now_utc())
            .expect("snapshot")
            .days
            .iter()
            .map(|day| day.total)
            .sum()
    }

    #[tokio::test(start_paused = true)]
    async fn miss_then_hit() {
        let provider = CountingProvider::returning(Ok(sample_series()));
        let pipeline = StockPipeline::new(provider.clone());

        let first = pipeline.get_series("aapl").await.expect("first fetch");
        assert!(!first.cached);
        assert_eq!(first.symbol.as_str(), "AAPL");
        assert_eq!(provider.calls(), 1);
        assert_eq!(total_usage(&pipeline), 1);

        let second = pipeline.get_series("AAPL").await.expect("cached fetch");
        assert!(second.cached);
        assert_eq!(second.series, first.series);
        assert_eq!(provider.calls(), 1);
        assert_eq!(total_usage(&pipeline), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_symbol_has_no_side_effects() {
        let provider = CountingProvider::returning(Ok(sample_series()));
        let pipeline = StockPipeline::new(provider.clone());

        let error = pipeline.get_series("XOM").await.expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::InvalidSymbol);
        assert_eq!(provider.calls(), 0);
        assert_eq!(total_usage(&pipeline), 0);
        assert!(pipeline.cache().is_empty().await);
        assert_eq!(pipeline.rate_gate().dispatched(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn provider_errors_propagate_without_caching() {
        let provider = CountingProvider::returning(Err(ProviderError::RateLimited {
            notice: String::from("5 calls per minute"),
        }));
        let pipeline = StockPipeline::new(provider.clone());

        let error = pipeline.get_series("MSFT").await.expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::RateLimited);
        assert!(pipeline.cache().is_empty().await);

        let again = pipeline.get_series("MSFT").await.expect_err("no cached failure");
        assert_eq!(again.kind(), ErrorKind::RateLimited);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_fetched_again() {
        let provider = CountingProvider::returning(Ok(sample_series()));
        let pipeline = StockPipeline::new(provider.clone());

        pipeline.get_series("NVDA").await.expect("first fetch");
        tokio::time::advance(Duration::from_secs(3600)).await;

        let refreshed = pipeline.get_series("NVDA").await.expect("refetch");
        assert!(!refreshed.cached);
        assert_eq!(provider.calls(), 2);
    }
}
