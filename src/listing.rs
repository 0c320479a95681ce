//! Listing service
//!
//! Composes catalog, spot price, pricing and filters into the two read
//! operations served over HTTP. Every call works on a fresh catalog load and
//! keeps no state of its own.

use std::sync::Arc;
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::error::{ListingError, Result};
use crate::filter::{apply_filters, FilterCriteria};
use crate::pricing::{price_catalog, to_display, DisplayProduct, PriceOracle};

/// Filtered, priced products plus the spot price they were priced with
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub products: Vec<DisplayProduct>,
    pub spot_price: f64,
}

#[derive(Clone)]
pub struct ListingService {
    catalog: CatalogStore,
    oracle: Arc<PriceOracle>,
}

impl ListingService {
    pub fn new(catalog: CatalogStore, oracle: Arc<PriceOracle>) -> Self {
        Self { catalog, oracle }
    }

    pub fn oracle(&self) -> &Arc<PriceOracle> {
        &self.oracle
    }

    /// Price the whole catalog and keep what matches `criteria`
    pub async fn list_products(&self, criteria: &FilterCriteria) -> Result<Listing> {
        let catalog = self.catalog.load().await?;
        let spot_price = self.oracle.spot_price().await;

        let total = catalog.len();
        let products = apply_filters(price_catalog(catalog, spot_price), criteria);

        debug!(
            total = total,
            matched = products.len(),
            spot_price = spot_price,
            "Products listed"
        );

        Ok(Listing {
            products,
            spot_price,
        })
    }

    /// Price a single product by catalog index
    pub async fn get_product(&self, id: i64) -> Result<DisplayProduct> {
        let mut catalog = self.catalog.load().await?;

        let index = usize::try_from(id)
            .ok()
            .filter(|&index| index < catalog.len())
            .ok_or_else(|| ListingError::NotFound(id.to_string()))?;

        let product = catalog.swap_remove(index);
        let spot_price = self.oracle.spot_price().await;

        Ok(to_display(index, product, spot_price))
    }
}
