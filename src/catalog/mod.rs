//! Catalog module
//!
//! Product records as they are stored in the static catalog file.

mod store;

pub use store::CatalogStore;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ListingError, Result};

/// Metal colour a piece is offered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorVariant {
    #[default]
    Yellow,
    White,
    Rose,
}

impl ColorVariant {
    pub const ALL: [ColorVariant; 3] = [ColorVariant::Yellow, ColorVariant::White, ColorVariant::Rose];

    /// Label shown under the product image
    pub fn label(self) -> &'static str {
        match self {
            ColorVariant::Yellow => "Yellow Gold",
            ColorVariant::White => "White Gold",
            ColorVariant::Rose => "Rose Gold",
        }
    }
}

impl fmt::Display for ColorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Image references per colour variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Images {
    pub yellow: String,
    pub white: String,
    pub rose: String,
}

impl Images {
    pub fn get(&self, color: ColorVariant) -> &str {
        match color {
            ColorVariant::Yellow => &self.yellow,
            ColorVariant::White => &self.white,
            ColorVariant::Rose => &self.rose,
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,

    /// Weight in grams
    pub weight: f64,

    /// Popularity in [0, 1]
    pub popularity_score: f64,

    pub images: Images,
}

impl Product {
    /// Reject records outside the ranges pricing relies on
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(ListingError::Catalog(format!(
                "{}: weight must be a positive number, got {}",
                self.name, self.weight
            )));
        }
        if !(0.0..=1.0).contains(&self.popularity_score) {
            return Err(ListingError::Catalog(format!(
                "{}: popularityScore must be within [0, 1], got {}",
                self.name, self.popularity_score
            )));
        }
        Ok(())
    }
}
