//! HTTP API
//!
//! Product routes are mounted at the root and again under `/api`, the prefix
//! the storefront uses.

mod handlers;
mod response;

pub use response::ApiResponse;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route("/health", get(handlers::health_check));

    let mut app = Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .route("/metrics", get(handlers::metrics));

    if let Some(dir) = &state.config.static_dir {
        info!(dir = %dir.display(), "Serving storefront assets");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on an already bound listener until the server stops
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(addr = %addr, "Starting listing API server");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
