use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::adapters::alphavantage::{ALPHAVANTAGE_BASE_URL, DEFAULT_TIMEOUT_MS};
use crate::cache::DEFAULT_CACHE_TTL;
use crate::rate_policy::RatePolicy;
use crate::usage::DEFAULT_RETENTION_DAYS;

pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// Settings needed to assemble a [`crate::StockPipeline`].
#[derive(Clone, PartialEq)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub rate_policy: RatePolicy,
    pub usage_retention_days: usize,
    /// Replaces the built-in allow-list when set.
    pub allow_list: Option<Vec<String>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_else(|_| String::from("demo")),
            base_url: String::from(ALPHAVANTAGE_BASE_URL),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            cache_ttl: DEFAULT_CACHE_TTL,
            rate_policy: RatePolicy::alphavantage_free_tier(),
            usage_retention_days: DEFAULT_RETENTION_DAYS,
            allow_list: None,
        }
    }
}

impl Debug for GatewayConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("rate_policy", &self.rate_policy)
            .field("usage_retention_days", &self.usage_retention_days)
            .field("allow_list", &self.allow_list)
            .finish()
    }
}
