//! Provider contract consumed by the pipeline.

use std::future::Future;
use std::pin::Pin;

use crate::{PriceSeries, ProviderError, Symbol};

/// Source of daily closing-price history.
///
/// Implementations perform exactly one upstream request per call and leave
/// caching and throttling to the caller.
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch_daily_series<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>>;
}
