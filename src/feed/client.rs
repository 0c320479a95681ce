//! HTTP client for the spot price feed
//!
//! Issues a single GET per call. Timeouts and caching are applied by the
//! price oracle, not here.

use async_trait::async_trait;
use tracing::debug;

use super::SpotPriceSource;
use crate::error::{ListingError, Result};
use crate::parser::parse_ounce_price;

/// Spot price source backed by a JSON HTTP endpoint
pub struct HttpSpotSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSpotSource {
    /// Create a new feed client
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpotPriceSource for HttpSpotSource {
    async fn fetch_ounce_price(&self) -> Result<f64> {
        debug!(url = %self.endpoint, "Fetching spot price");

        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::UpstreamUnavailable(format!(
                "Spot price feed answered {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_ounce_price(&body)
    }
}
