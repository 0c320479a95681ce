//! Parser module for spot price responses
//!
//! The feed answers either with a single quote object or a list of quotes,
//! with the price given per troy ounce as a number or a numeric string.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ListingError, Result};

/// One quote from the feed
#[derive(Debug, Clone, Deserialize)]
pub struct SpotQuote {
    /// Price per troy ounce
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
}

/// Raw response payload
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpotPayload {
    Single(SpotQuote),
    Series(Vec<SpotQuote>),
}

impl SpotPayload {
    /// Price of the first quote carried by the payload
    pub fn price(&self) -> Option<f64> {
        match self {
            SpotPayload::Single(quote) => quote.price,
            SpotPayload::Series(quotes) => quotes.first().and_then(|q| q.price),
        }
    }
}

/// Parse a raw feed response into a usable price per troy ounce
pub fn parse_ounce_price(raw: &str) -> Result<f64> {
    let payload: SpotPayload = serde_json::from_str(raw)
        .map_err(|e| ListingError::ParseError(e.to_string()))?;

    match payload.price() {
        Some(price) if price.is_finite() && price > 0.0 => Ok(price),
        Some(price) => Err(ListingError::ParseError(format!(
            "Unusable spot price: {}",
            price
        ))),
        None => Err(ListingError::ParseError(
            "Response carries no price".to_string(),
        )),
    }
}

/// Custom deserializer for prices sent either as numbers or strings
fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "Invalid price value: {}",
            other
        ))),
    }
}
