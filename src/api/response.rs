//! Response envelope and error mapping for the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::ListingError;

/// `{success, data, goldPrice, error}` envelope shared by all product routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Spot price the listing was priced with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            gold_price: None,
            error: None,
        }
    }

    pub fn with_gold_price(mut self, gold_price: f64) -> Self {
        self.gold_price = Some(gold_price);
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            gold_price: None,
            error: Some(message.into()),
        }
    }
}

impl ListingError {
    /// Status code and client-facing message. Server-side detail is never exposed.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ListingError::NotFound(_) => (StatusCode::NOT_FOUND, "Product not found".to_string()),
            ListingError::InvalidFilter(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        }

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
