//! Quote provider implementations.

pub mod alphavantage;

pub use alphavantage::{parse_daily_series, AlphaVantageClient};
