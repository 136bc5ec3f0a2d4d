//! # cjis-api: Axum API for the CJIS Policy Auditor
//!
//! Scores agency security policies against CJIS Security Policy sections
//! and runs the auditor review workflow over the results.
//!
//! ## API Surface
//!
//! | Prefix                 | Module                      | Purpose                  |
//! |------------------------|-----------------------------|--------------------------|
//! | `/v1/sections*`        | [`routes::sections`]        | Catalog browsing         |
//! | `/v1/analyze*`         | [`routes::analyze`]         | Stateless checks         |
//! | `/v1/analyses*`        | [`routes::analyses`]        | Review and final report  |
//! | `/metrics`             | [`middleware::metrics`]     | Request counters         |
//! | `/health/*`            | this module                 | Probes (no auth)         |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod intake;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the upload limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::sections::router())
        .merge(routes::analyze::router())
        .merge(routes::analyses::router())
        .merge(openapi::router())
        .route("/metrics", get(middleware::metrics::metrics_snapshot))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(CorsLayer::permissive())
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the catalog is loaded before the router is built, so
/// a serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}
