//! Command-line and environment configuration for the `quotegate` server.
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--host` | `QUOTEGATE_HOST` | `127.0.0.1` | Listen address |
//! | `--port` | `QUOTEGATE_PORT` | `3000` | Listen port |
//! | `--api-key` | `ALPHAVANTAGE_API_KEY` | `demo` | Provider credential |
//! | `--base-url` | `ALPHAVANTAGE_BASE_URL` | `https://www.alphavantage.co` | Provider endpoint |
//! | `--timeout-ms` | | `10000` | Provider request timeout |
//! | `--cache-ttl-secs` | | `3600` | Cache freshness window |
//! | `--min-spacing-secs` | | `13` | Gap between provider calls |
//! | `--usage-retention-days` | | `30` | Days of usage history kept |
//! | `--symbols` | `QUOTEGATE_SYMBOLS` | built-in list | Comma-separated allow-list |
//!
//! ```bash
//! ALPHAVANTAGE_API_KEY=... quotegate --port 8080
//! quotegate --symbols AAPL,MSFT --cache-ttl-secs 600
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use quotegate_core::{GatewayConfig, RatePolicy, ALPHAVANTAGE_BASE_URL, API_KEY_ENV};

use crate::error::ServerError;

/// Stock closing-price proxy with caching and provider rate limiting.
#[derive(Debug, Parser)]
#[command(name = "quotegate", author, version, about)]
pub struct ServerArgs {
    /// Address to bind.
    #[arg(long, env = "QUOTEGATE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "QUOTEGATE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Alpha Vantage API key.
    #[arg(long, env = API_KEY_ENV, default_value = "demo", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "ALPHAVANTAGE_BASE_URL", default_value = ALPHAVANTAGE_BASE_URL)]
    pub base_url: String,

    /// Provider request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[arg(long, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Minimum seconds between the end of one provider call and the start of the next.
    #[arg(long, default_value_t = 13)]
    pub min_spacing_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub usage_retention_days: usize,

    /// Replace the built-in symbol allow-list.
    #[arg(long, env = "QUOTEGATE_SYMBOLS", value_delimiter = ',')]
    pub symbols: Option<Vec<String>>,
}

impl ServerArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_millis(self.timeout_ms),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            rate_policy: RatePolicy::alphavantage_free_tier()
                .with_min_spacing(Duration::from_secs(self.min_spacing_secs)),
            usage_retention_days: self.usage_retention_days,
            allow_list: self.symbols.clone(),
        }
    }
}
