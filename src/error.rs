//! Error types for the listing service

use thiserror::Error;

/// Listing service errors
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Spot price source unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Failed to parse spot price response: {0}")]
    ParseError(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListingError {
    /// Whether the error is caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, ListingError::NotFound(_) | ListingError::InvalidFilter(_))
    }
}

impl From<reqwest::Error> for ListingError {
    fn from(err: reqwest::Error) -> Self {
        ListingError::UpstreamUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for ListingError {
    fn from(err: std::io::Error) -> Self {
        ListingError::Catalog(err.to_string())
    }
}

impl From<prometheus::Error> for ListingError {
    fn from(err: prometheus::Error) -> Self {
        ListingError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;
