//! Numeric range filters over priced products
//!
//! Bounds are inclusive and compose conjunctively. Query strings may carry
//! empty values (`?minPrice=`), which count as absent.

use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::DisplayProduct;

/// Optional bounds on price and popularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, deserialize_with = "deserialize_bound", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_bound", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_bound", skip_serializing_if = "Option::is_none")]
    pub min_popularity: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_bound", skip_serializing_if = "Option::is_none")]
    pub max_popularity: Option<f64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single product passes every present bound
    pub fn matches(&self, product: &DisplayProduct) -> bool {
        let popularity = product.product.popularity_score;

        self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
            && self.min_popularity.map_or(true, |min| popularity >= min)
            && self.max_popularity.map_or(true, |max| popularity <= max)
    }
}

/// Keep the products matching `criteria`, preserving their order
pub fn apply_filters(products: Vec<DisplayProduct>, criteria: &FilterCriteria) -> Vec<DisplayProduct> {
    if criteria.is_empty() {
        return products;
    }
    products.into_iter().filter(|p| criteria.matches(p)).collect()
}

/// Custom deserializer for bounds sent as query strings or JSON numbers
fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBound {
        Number(f64),
        Text(String),
    }

    let bound = match Option::<RawBound>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawBound::Number(n)) => n,
        Some(RawBound::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(RawBound::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {:?}", s)))?,
    };

    if bound.is_finite() {
        Ok(Some(bound))
    } else {
        Err(serde::de::Error::custom(format!("bound must be finite, got {}", bound)))
    }
}
