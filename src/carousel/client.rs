//! HTTP client for the listing API
//!
//! Filter criteria are sent as query parameters; filtering happens server side.

use reqwest::StatusCode;
use tracing::debug;

use crate::api::ApiResponse;
use crate::error::{ListingError, Result};
use crate::filter::FilterCriteria;
use crate::pricing::DisplayProduct;

/// Client for the `/products` routes of a listing server
#[derive(Debug, Clone)]
pub struct ListingClient {
    client: reqwest::Client,
    base_url: String,
}

impl ListingClient {
    /// `base_url` is the prefix the routes hang off, e.g. `http://host:3000/api`
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the priced listing matching `criteria`
    pub async fn fetch_products(&self, criteria: &FilterCriteria) -> Result<Vec<DisplayProduct>> {
        let url = format!("{}/products", self.base_url);
        debug!(url = %url, criteria = ?criteria, "Fetching products");

        let response = self.client.get(&url).query(criteria).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiResponse<()>>()
                .await
                .ok()
                .and_then(|body| body.error);
            return Err(status_error(status, message, "Failed to fetch products"));
        }

        let body: ApiResponse<Vec<DisplayProduct>> = response
            .json()
            .await
            .map_err(|e| ListingError::ParseError(e.to_string()))?;
        into_data(body)
    }

    /// Fetch a single product by catalog index
    pub async fn fetch_product(&self, id: usize) -> Result<DisplayProduct> {
        let url = format!("{}/products/{}", self.base_url, id);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(ListingError::NotFound(id.to_string())),
            status if !status.is_success() => {
                return Err(status_error(
                    status,
                    None,
                    &format!("Failed to fetch product {}", id),
                ))
            }
            _ => {}
        }

        let body: ApiResponse<DisplayProduct> = response
            .json()
            .await
            .map_err(|e| ListingError::ParseError(e.to_string()))?;
        into_data(body)
    }
}

/// Map a non-success status to the error kind the server reported
fn status_error(status: StatusCode, message: Option<String>, context: &str) -> ListingError {
    match status {
        StatusCode::NOT_FOUND => {
            ListingError::NotFound(message.unwrap_or_else(|| format!("{}: {}", context, status)))
        }
        status if status.is_client_error() => {
            let message = message.unwrap_or_else(|| format!("{}: {}", context, status));
            let message = match message.strip_prefix("Invalid filter: ") {
                Some(detail) => detail.to_string(),
                None => message,
            };
            ListingError::InvalidFilter(message)
        }
        _ => ListingError::UpstreamUnavailable(format!("{}: {}", context, status)),
    }
}

fn into_data<T>(body: ApiResponse<T>) -> Result<T> {
    match body {
        ApiResponse {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        ApiResponse { error, .. } => Err(ListingError::Internal(
            error.unwrap_or_else(|| "Unknown error".to_string()),
        )),
    }
}
