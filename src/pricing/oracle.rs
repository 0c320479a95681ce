//! Spot price oracle
//!
//! Caches the gold price per gram for a fixed window. A failed refresh never
//! reaches the caller: the last known value (or the fallback before the first
//! success) is served instead.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{timeout, Instant};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ListingError, Result};
use crate::feed::SpotPriceSource;
use crate::metrics::Metrics;

/// Grams in one troy ounce
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Cached spot price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    /// Price per gram
    pub value: f64,
    /// When the refresh that produced `value` started; `None` for the fallback
    pub fetched_at: Option<Instant>,
}

impl PriceQuote {
    pub fn fallback(value: f64) -> Self {
        Self {
            value,
            fetched_at: None,
        }
    }

    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.fetched_at
            .map(|at| now.saturating_duration_since(at) < ttl)
            .unwrap_or(false)
    }
}

/// Process-wide source of the spot price used for pricing
pub struct PriceOracle {
    source: Arc<dyn SpotPriceSource>,
    quote: RwLock<PriceQuote>,
    ttl: Duration,
    fetch_timeout: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl PriceOracle {
    pub fn new(
        source: Arc<dyn SpotPriceSource>,
        fallback: f64,
        ttl: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            quote: RwLock::new(PriceQuote::fallback(fallback)),
            ttl,
            fetch_timeout,
            metrics: None,
        }
    }

    pub fn from_config(source: Arc<dyn SpotPriceSource>, config: &Config) -> Self {
        Self::new(
            source,
            config.fallback_spot_price,
            config.spot_cache_ttl(),
            config.spot_fetch_timeout(),
        )
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Current spot price per gram, refreshing it first when the cache is stale
    ///
    /// Stale reads are not coalesced: every caller that finds the cache
    /// expired issues its own upstream request, and the last successful write
    /// wins.
    pub async fn spot_price(&self) -> f64 {
        let now = Instant::now();

        let cached = *self.quote.read().await;
        let value = if cached.is_fresh(now, self.ttl) {
            cached.value
        } else {
            self.refresh_from(now).await
        };

        if let Some(metrics) = &self.metrics {
            metrics.set_spot_price(value);
        }
        value
    }

    /// Force a refresh attempt regardless of the cache age
    pub async fn refresh(&self) -> f64 {
        self.refresh_from(Instant::now()).await
    }

    /// Cached quote, without touching the upstream
    pub async fn snapshot(&self) -> PriceQuote {
        *self.quote.read().await
    }

    // The lock is not held across the fetch; concurrent refreshes each write
    // their own result and the last one wins.
    async fn refresh_from(&self, started: Instant) -> f64 {
        match self.fetch_gram_price().await {
            Ok(value) => {
                *self.quote.write().await = PriceQuote {
                    value,
                    fetched_at: Some(started),
                };
                self.record_refresh(true);
                info!(price_per_gram = value, "Spot price refreshed");
                value
            }
            Err(e) => {
                self.record_refresh(false);
                let cached = self.quote.read().await.value;
                warn!(error = %e, cached = cached, "Failed to fetch spot price, using cached value");
                cached
            }
        }
    }

    async fn fetch_gram_price(&self) -> Result<f64> {
        let ounce_price = timeout(self.fetch_timeout, self.source.fetch_ounce_price())
            .await
            .map_err(|_| {
                ListingError::UpstreamUnavailable(format!(
                    "Spot price fetch timed out after {}ms",
                    self.fetch_timeout.as_millis()
                ))
            })??;

        Ok(ounce_price / GRAMS_PER_TROY_OUNCE)
    }

    fn record_refresh(&self, success: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_refresh(success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MockSpotPriceSource;
    use async_trait::async_trait;
    use mockall::Sequence;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FALLBACK: f64 = 65.50;
    const HOUR: Duration = Duration::from_secs(3600);

    fn oracle(source: MockSpotPriceSource) -> PriceOracle {
        PriceOracle::new(Arc::new(source), FALLBACK, HOUR, Duration::from_secs(5))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    struct StalledSource;

    #[async_trait]
    impl SpotPriceSource for StalledSource {
        async fn fetch_ounce_price(&self) -> Result<f64> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(9999.0)
        }
    }

    /// Answers each call after its own delay, in call order
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Vec<(Duration, f64)>,
    }

    #[async_trait]
    impl SpotPriceSource for ScriptedSource {
        async fn fetch_ounce_price(&self) -> Result<f64> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, price) = self.script[call];
            tokio::time::sleep(delay).await;
            Ok(price)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_falls_back_when_upstream_fails() {
        let mut source = MockSpotPriceSource::new();
        source
            .expect_fetch_ounce_price()
            .times(1)
            .returning(|| Err(ListingError::UpstreamUnavailable("offline".to_string())));

        let oracle = oracle(source);
        assert_eq!(oracle.snapshot().await, PriceQuote::fallback(FALLBACK));
        assert_eq!(oracle.spot_price().await, FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_converts_ounce_to_gram() {
        let mut source = MockSpotPriceSource::new();
        source
            .expect_fetch_ounce_price()
            .times(1)
            .returning(|| Ok(3110.35));

        let oracle = oracle(source);
        assert_close(oracle.spot_price().await, 100.0);
        assert!(oracle.snapshot().await.fetched_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_within_window() {
        let mut seq = Sequence::new();
        let mut source = MockSpotPriceSource::new();
        source
            .expect_fetch_ounce_price()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(3110.35));
        source
            .expect_fetch_ounce_price()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(6220.70));

        let oracle = oracle(source);
        assert_close(oracle.spot_price().await, 100.0);

        // Upstream moved, but the cached value is still fresh
        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        assert_close(oracle.spot_price().await, 100.0);

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        assert_close(oracle.spot_price().await, 200.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_cache_survives_failed_refresh() {
        let mut seq = Sequence::new();
        let mut source = MockSpotPriceSource::new();
        source
            .expect_fetch_ounce_price()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(3110.35));
        source
            .expect_fetch_ounce_price()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ListingError::ParseError("no price".to_string())));

        let oracle = oracle(source);
        assert_close(oracle.spot_price().await, 100.0);
        let before = oracle.snapshot().await;

        tokio::time::advance(HOUR + Duration::from_secs(1)).await;
        assert_close(oracle.spot_price().await, 100.0);
        assert_eq!(oracle.snapshot().await, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_to_cached_value() {
        let oracle = PriceOracle::new(
            Arc::new(StalledSource),
            FALLBACK,
            HOUR,
            Duration::from_secs(5),
        );

        let started = Instant::now();
        assert_eq!(oracle.spot_price().await, FALLBACK);
        assert!(started.elapsed() < Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_ignores_cache_age() {
        let mut source = MockSpotPriceSource::new();
        source
            .expect_fetch_ounce_price()
            .times(2)
            .returning(|| Ok(3110.35));

        let oracle = oracle(source);
        oracle.spot_price().await;
        assert_close(oracle.refresh().await, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_recorded() {
        let mut source = MockSpotPriceSource::new();
        source
            .expect_fetch_ounce_price()
            .times(1)
            .returning(|| Err(ListingError::UpstreamUnavailable("offline".to_string())));

        let metrics = Arc::new(Metrics::new().unwrap());
        let oracle = oracle(source).with_metrics(metrics.clone());
        oracle.spot_price().await;

        let text = metrics.encode().unwrap();
        assert!(text.contains(r#"spot_price_refresh_total{outcome="failure"} 1"#));
        assert!(text.contains("spot_price_per_gram 65.5"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refreshes_last_write_wins() {
        // First fetch is slow, second is fast: the slow one completes last
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            script: vec![
                (Duration::from_secs(3), 2000.0 * GRAMS_PER_TROY_OUNCE),
                (Duration::from_secs(1), 3000.0 * GRAMS_PER_TROY_OUNCE),
            ],
        };
        let oracle = PriceOracle::new(Arc::new(source), FALLBACK, HOUR, Duration::from_secs(5));

        let started = Instant::now();
        let (slow, fast, during) = tokio::join!(
            oracle.refresh(),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                oracle.refresh().await
            },
            async {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                let read_at = Instant::now();
                let quote = oracle.snapshot().await;
                (quote, read_at.elapsed())
            },
        );

        assert_close(slow, 2000.0);
        assert_close(fast, 3000.0);

        // Read taken while the slow fetch was pending saw the fast write at once
        let (quote, waited) = during;
        assert_close(quote.value, 3000.0);
        assert_eq!(waited, Duration::ZERO);

        let settled = oracle.snapshot().await;
        assert_close(settled.value, 2000.0);
        assert_eq!(settled.fetched_at, Some(started));
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_read_not_blocked_by_pending_refresh() {
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            script: vec![
                (Duration::ZERO, 2000.0 * GRAMS_PER_TROY_OUNCE),
                (Duration::from_secs(4), 3000.0 * GRAMS_PER_TROY_OUNCE),
            ],
        };
        let oracle = PriceOracle::new(Arc::new(source), FALLBACK, HOUR, Duration::from_secs(5));
        assert_close(oracle.spot_price().await, 2000.0);

        let (refreshed, (read, waited)) = tokio::join!(oracle.refresh(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let read_at = Instant::now();
            (oracle.spot_price().await, read_at.elapsed())
        });

        assert_close(read, 2000.0);
        assert_eq!(waited, Duration::ZERO);
        assert_close(refreshed, 3000.0);
        assert_close(oracle.snapshot().await.value, 3000.0);
    }
}
