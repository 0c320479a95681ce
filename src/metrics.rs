//! Prometheus metrics for the listing service

use prometheus::{Encoder, Gauge, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::Result;

/// Service counters, registered on a private registry
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    spot_refreshes: IntCounterVec,
    listing_requests: IntCounterVec,
    spot_price: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let spot_refreshes = IntCounterVec::new(
            Opts::new("spot_price_refresh_total", "Spot price refresh attempts by outcome"),
            &["outcome"],
        )?;
        let listing_requests = IntCounterVec::new(
            Opts::new("listing_requests_total", "Listing API requests by route"),
            &["route"],
        )?;
        let spot_price = Gauge::new("spot_price_per_gram", "Spot price per gram last served")?;

        registry.register(Box::new(spot_refreshes.clone()))?;
        registry.register(Box::new(listing_requests.clone()))?;
        registry.register(Box::new(spot_price.clone()))?;

        Ok(Self {
            registry,
            spot_refreshes,
            listing_requests,
            spot_price,
        })
    }

    pub fn record_refresh(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.spot_refreshes.with_label_values(&[outcome]).inc();
    }

    pub fn record_request(&self, route: &str) {
        self.listing_requests.with_label_values(&[route]).inc();
    }

    pub fn set_spot_price(&self, value: f64) {
        self.spot_price.set(value);
    }

    /// Render all metrics in the text exposition format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| crate::error::ListingError::Internal(e.to_string()))
    }
}
