//! Jewelry Listing Service Library
//!
//! This crate serves a static jewelry catalog priced against the live gold
//! spot price, and provides the carousel view model the storefront renders.

use std::sync::Arc;

pub mod api;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod listing;
pub mod metrics;
pub mod parser;
pub mod pricing;

pub use carousel::{CarouselController, CarouselState, CarouselViewState, ListingClient};
pub use catalog::{CatalogStore, ColorVariant, Product};
pub use config::Config;
pub use error::{ListingError, Result};
pub use feed::{HttpSpotSource, SpotPriceSource};
pub use filter::{apply_filters, FilterCriteria};
pub use listing::{Listing, ListingService};
pub use metrics::Metrics;
pub use pricing::{DisplayProduct, PriceOracle, PriceQuote};

/// Application state shared across request handlers
pub struct AppState {
    pub listing: ListingService,
    pub metrics: Arc<Metrics>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the catalog and spot price source into a ready-to-serve state
    pub fn new(
        config: Config,
        catalog: CatalogStore,
        source: Arc<dyn SpotPriceSource>,
    ) -> Result<Self> {
        let metrics = Arc::new(Metrics::new()?);
        let oracle = PriceOracle::from_config(source, &config).with_metrics(metrics.clone());

        Ok(Self {
            listing: ListingService::new(catalog, Arc::new(oracle)),
            metrics,
            config: Arc::new(config),
        })
    }
}
