use std::time::Duration;

/// Outbound call budget for the quote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    /// Gap enforced between the end of one call and the start of the next.
    pub min_spacing: Duration,
    pub quota_window: Duration,
    pub quota_limit: u32,
}

impl RatePolicy {
    /// Alpha Vantage free tier: 5 calls per minute, spaced 13 seconds apart.
    pub const fn alphavantage_free_tier() -> Self {
        Self {
            min_spacing: Duration::from_secs(13),
            quota_window: Duration::from_secs(60),
            quota_limit: 5,
        }
    }

    pub const fn with_min_spacing(mut self, min_spacing: Duration) -> Self {
        self.min_spacing = min_spacing;
        self
    }
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self::alphavantage_free_tier()
    }
}
