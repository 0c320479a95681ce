//! Jewelry Listing Service
//!
//! Serves the product catalog priced against the gold spot price, plus the
//! storefront assets when a static directory is configured.

use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jewelry_listing::{api, AppState, CatalogStore, Config, HttpSpotSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Starting Jewelry Listing Service");

    let config = Config::load()?;
    info!(
        catalog = %config.catalog_path.display(),
        spot_price_url = %config.spot_price_url,
        "Configuration loaded"
    );

    let source = Arc::new(HttpSpotSource::new(&config.spot_price_url));
    let catalog = CatalogStore::from_file(config.catalog_path.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    let state = Arc::new(AppState::new(config, catalog, source)?);
    api::serve(listener, state).await
}
