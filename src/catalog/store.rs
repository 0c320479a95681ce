//! Catalog store
//!
//! Loads the immutable product list. File-backed stores re-read the file on
//! every call so catalog edits show up without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::Product;
use crate::error::{ListingError, Result};

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Memory(Arc<Vec<Product>>),
}

/// Read-only source of catalog records
#[derive(Debug, Clone)]
pub struct CatalogStore {
    source: Source,
}

impl CatalogStore {
    /// Store backed by a JSON array file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    /// Store backed by an in-memory list
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            source: Source::Memory(Arc::new(products)),
        }
    }

    /// Load the full catalog, rejecting it if any record is out of range
    pub async fn load(&self) -> Result<Vec<Product>> {
        let products = match &self.source {
            Source::File(path) => load_file(path).await?,
            Source::Memory(products) => products.as_ref().clone(),
        };

        products.iter().try_for_each(Product::validate)?;
        Ok(products)
    }
}

async fn load_file(path: &Path) -> Result<Vec<Product>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        ListingError::Catalog(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let products: Vec<Product> = serde_json::from_str(&raw).map_err(|e| {
        ListingError::Catalog(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    debug!(path = %path.display(), count = products.len(), "Catalog loaded");
    Ok(products)
}
