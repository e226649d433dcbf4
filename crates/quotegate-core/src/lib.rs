//! # Quotegate Core
//!
//! Fetch, cache and rate-limit pipeline behind the quotegate stock-data
//! endpoint.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage daily-series client |
//! | [`cache`] | One-hour TTL cache of price series |
//! | [`config`] | Gateway settings |
//! | [`domain`] | Symbol, date, price point and series types |
//! | [`error`] | Validation, provider and pipeline errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`pipeline`] | Request orchestration |
//! | [`provider`] | Provider trait |
//! | [`rate_policy`] | Outbound call budget |
//! | [`throttling`] | Rate gate for provider calls |
//! | [`usage`] | Day/hour/minute usage counters |
//! | [`validator`] | Symbol allow-list |
//!
//! ## Architecture
//!
//! ```text
//! request ──▶ SymbolValidator ──▶ QuoteCache ──hit──▶ response (cached)
//!                                     │
//!                                    miss
//!                                     ▼
//!                  UsageTracker ◀── StockPipeline
//!                                     │
//!                                     ▼
//!                                 RateGate (13s spacing, 5/min)
//!                                     │
//!                                     ▼
//!                        AlphaVantageClient ──▶ HttpClient
//!                                     │
//!                                     ▼
//!                     QuoteCache::put ──▶ response (fresh)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quotegate_core::{GatewayConfig, StockPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = StockPipeline::from_config(&GatewayConfig::default());
//!     let result = pipeline.get_series("AAPL").await?;
//!     println!("{} points, cached={}", result.series.len(), result.cached);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use quotegate_core::{ErrorKind, PipelineError};
//!
//! fn describe(error: &PipelineError) -> &'static str {
//!     match error.kind() {
//!         ErrorKind::InvalidSymbol => "fix the symbol",
//!         ErrorKind::RateLimited => "try again later",
//!         ErrorKind::NotFound => "no data",
//!         ErrorKind::MalformedResponse | ErrorKind::TransientNetworkFailure => "upstream failure",
//!     }
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod provider;
pub mod rate_policy;
pub mod throttling;
pub mod usage;
pub mod validator;

pub use adapters::alphavantage::ALPHAVANTAGE_BASE_URL;
pub use adapters::AlphaVantageClient;
pub use cache::QuoteCache;
pub use config::{GatewayConfig, API_KEY_ENV};
pub use domain::{PricePoint, PriceSeries, Symbol, TradingDate, UtcDateTime};
pub use error::{ErrorKind, PipelineError, ProviderError, UsageError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use pipeline::{SeriesResult, StockPipeline};
pub use provider::QuoteProvider;
pub use rate_policy::RatePolicy;
pub use throttling::{RateGate, RatePermit};
pub use usage::{DayUsageSummary, UsageSnapshot, UsageTracker};
pub use validator::{SymbolValidator, DEFAULT_ALLOW_LIST};
