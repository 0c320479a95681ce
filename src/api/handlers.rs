//! Route handlers

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

use super::response::ApiResponse;
use crate::error::{ListingError, Result};
use crate::filter::FilterCriteria;
use crate::pricing::DisplayProduct;
use crate::AppState;

/// `GET /products?minPrice&maxPrice&minPopularity&maxPopularity`
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<FilterCriteria>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<DisplayProduct>>>> {
    state.metrics.record_request("list_products");

    let Query(criteria) = query.map_err(|e| ListingError::InvalidFilter(e.body_text()))?;
    let listing = state.listing.list_products(&criteria).await?;

    Ok(Json(
        ApiResponse::ok(listing.products).with_gold_price(listing.spot_price),
    ))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<DisplayProduct>>> {
    state.metrics.record_request("get_product");

    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| ListingError::NotFound(raw_id.clone()))?;
    let product = state.listing.get_product(id).await?;

    Ok(Json(ApiResponse::ok(product)))
}

/// `GET /health`
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }))
}

/// `GET /metrics`
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<String> {
    state.metrics.encode()
}
