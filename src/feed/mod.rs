//! Spot price feed module
//!
//! Upstream source of the gold price the catalog is priced against.

mod client;

pub use client::HttpSpotSource;

use async_trait::async_trait;

use crate::error::Result;

/// Anything that can quote the current gold price per troy ounce
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    /// Fetch the latest price per troy ounce
    async fn fetch_ounce_price(&self) -> Result<f64>;
}
