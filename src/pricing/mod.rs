//! Pricing module
//!
//! Derives the displayed price and star rating of each catalog item from the
//! current gold spot price.

mod oracle;

pub use oracle::{PriceOracle, PriceQuote, GRAMS_PER_TROY_OUNCE};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Catalog item with its derived, per-request pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProduct {
    /// Position in the catalog
    pub id: usize,

    #[serde(flatten)]
    pub product: Product,

    /// Price in currency units, 2 decimals
    pub price: f64,

    /// Rating out of 5, 1 decimal
    pub star_rating: f64,

    /// Spot price per gram the price was computed with
    pub gold_price: f64,
}

/// `(popularity + 1) * weight * spot`, rounded to cents
pub fn price(product: &Product, spot_price: f64) -> f64 {
    round_dp((product.popularity_score + 1.0) * product.weight * spot_price, 2)
}

/// Popularity scaled to a 5 star rating, rounded to one decimal
pub fn star_rating(product: &Product) -> f64 {
    round_dp(product.popularity_score * 5.0, 1)
}

pub fn to_display(id: usize, product: Product, spot_price: f64) -> DisplayProduct {
    DisplayProduct {
        id,
        price: price(&product, spot_price),
        star_rating: star_rating(&product),
        gold_price: spot_price,
        product,
    }
}

/// Price a whole catalog, keeping catalog order
pub fn price_catalog(products: Vec<Product>, spot_price: f64) -> Vec<DisplayProduct> {
    products
        .into_iter()
        .enumerate()
        .map(|(id, product)| to_display(id, product, spot_price))
        .collect()
}

/// Half-away-from-zero rounding applied to the decimal value, not the binary one
fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
