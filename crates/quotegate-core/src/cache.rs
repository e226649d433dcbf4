//! In-memory TTL cache for daily price series.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::{PriceSeries, Symbol};

/// Default lifetime of a cached series.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CacheEntry {
    series: PriceSeries,
    inserted_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<Symbol, CacheEntry>,
    ttl: Duration,
}

impl CacheInner {
    fn new(ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            ttl,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    fn get(&self, symbol: &Symbol) -> Option<PriceSeries> {
        let now = Instant::now();
        self.map.get(symbol).and_then(|entry| {
            if self.is_fresh(entry, now) {
                Some(entry.series.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, symbol: Symbol, series: PriceSeries) {
        let entry = CacheEntry {
            series,
            inserted_at: Instant::now(),
        };
        self.map.insert(symbol, entry);
    }

    fn clear_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        let ttl = self.ttl;
        self.map
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        before - self.map.len()
    }
}

/// Thread-safe symbol -> series cache with lazy, read-time expiry.
#[derive(Debug, Clone)]
pub struct QuoteCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(ttl))),
        }
    }

    /// Returns the cached series if it was stored less than one TTL ago.
    pub async fn get(&self, symbol: &Symbol) -> Option<PriceSeries> {
        let store = self.inner.read().await;
        store.get(symbol)
    }

    /// Stores `series`, replacing any previous entry and restarting its TTL.
    pub async fn put(&self, symbol: Symbol, series: PriceSeries) {
        let mut store = self.inner.write().await;
        store.put(symbol, series);
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn clear_expired(&self) -> usize {
        let mut store = self.inner.write().await;
        store.clear_expired()
    }

    /// Number of entries held, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricePoint, TradingDate};

    fn series(closes: &[(&str, f64)]) -> PriceSeries {
        let points = closes
            .iter()
            .map(|(date, close)| {
                PricePoint::new(TradingDate::parse(date).expect("date"), *close).expect("point")
            })
            .collect();
        PriceSeries::new(points).expect("series")
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("symbol")
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = QuoteCache::default();
        let aapl = symbol("AAPL");

        assert!(cache.get(&aapl).await.is_none());

        let first = series(&[("2024-01-02", 185.6)]);
        cache.put(aapl.clone(), first.clone()).await;
        assert_eq!(cache.get(&aapl).await, Some(first));

        let second = series(&[("2024-01-02", 185.6), ("2024-01-03", 186.2)]);
        cache.put(aapl.clone(), second.clone()).await;
        assert_eq!(cache.get(&aapl).await, Some(second));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expires_exactly_at_ttl() {
        let cache = QuoteCache::new(Duration::from_secs(3600));
        let msft = symbol("MSFT");
        cache.put(msft.clone(), series(&[("2024-01-02", 370.9)])).await;

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get(&msft).await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&msft).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_restarts_the_ttl_clock() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        let nvda = symbol("NVDA");
        cache.put(nvda.clone(), series(&[("2024-01-02", 481.7)])).await;

        tokio::time::advance(Duration::from_secs(50)).await;
        cache.put(nvda.clone(), series(&[("2024-01-03", 475.7)])).await;

        tokio::time::advance(Duration::from_secs(50)).await;
        let cached = cache.get(&nvda).await.expect("refreshed entry is fresh");
        assert_eq!(cached.len(), 1);
        assert_eq!(cached.points()[0].close, 475.7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_expired_sweeps_only_stale_entries() {
        let cache = QuoteCache::new(Duration::from_secs(100));
        cache.put(symbol("AAPL"), series(&[("2024-01-02", 1.0)])).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        cache.put(symbol("MSFT"), series(&[("2024-01-02", 2.0)])).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.clear_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&symbol("MSFT")).await.is_some());
    }
}
