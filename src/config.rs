//! Configuration module for the listing service

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ListingError, Result};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address to bind the HTTP server to
    pub host: String,
    pub port: u16,

    /// JSON catalog file, re-read on every request
    pub catalog_path: PathBuf,

    /// Directory with the storefront assets, served as the router fallback
    pub static_dir: Option<PathBuf>,

    /// Spot price endpoint (price per troy ounce)
    pub spot_price_url: String,

    /// Upstream fetch timeout in milliseconds
    pub spot_fetch_timeout_ms: u64,

    /// How long a fetched spot price stays fresh
    pub spot_cache_ttl_secs: u64,

    /// Spot price per gram served before the first successful fetch
    pub fallback_spot_price: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            catalog_path: env::var("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            static_dir: env::var("STATIC_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            spot_price_url: env::var("SPOT_PRICE_URL").unwrap_or(defaults.spot_price_url),
            spot_fetch_timeout_ms: env_or("SPOT_FETCH_TIMEOUT_MS", defaults.spot_fetch_timeout_ms),
            spot_cache_ttl_secs: env_or("SPOT_CACHE_TTL_SECS", defaults.spot_cache_ttl_secs),
            fallback_spot_price: env_or("FALLBACK_SPOT_PRICE", defaults.fallback_spot_price),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.fallback_spot_price.is_finite() || self.fallback_spot_price <= 0.0 {
            return Err(ListingError::ConfigError(format!(
                "FALLBACK_SPOT_PRICE must be a positive number, got {}",
                self.fallback_spot_price
            )));
        }
        if self.spot_fetch_timeout_ms == 0 {
            return Err(ListingError::ConfigError(
                "SPOT_FETCH_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn spot_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.spot_fetch_timeout_ms)
    }

    pub fn spot_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.spot_cache_ttl_secs)
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            catalog_path: PathBuf::from("data/products.json"),
            static_dir: None,
            spot_price_url: "https://api.metals.live/v1/spot/gold".to_string(),
            spot_fetch_timeout_ms: 5000,
            spot_cache_ttl_secs: 3600,
            fallback_spot_price: 65.50,
        }
    }
}

/// Read and parse an environment variable, keeping the default when unset or malformed
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
