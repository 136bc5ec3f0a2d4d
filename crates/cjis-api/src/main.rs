//! # cjis-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the CJIS policy auditor.
//! Binds to a configurable port (default 8080).

use cjis_api::state::{AppConfig, AppState, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(?config, "starting CJIS policy auditor");

    let state = AppState::with_config(config.clone()).map_err(|e| {
        tracing::error!("Catalog initialization failed: {e}");
        e
    })?;
    tracing::info!(
        sections = state.checker.catalog().sections().len(),
        requirements = state.checker.catalog().len(),
        scorer = state.checker.scorer_name(),
        "catalog loaded"
    );
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; API routes are unauthenticated");
    }

    let app = cjis_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("CJIS auditor API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
