//! # Request Metrics
//!
//! In-process request counters using atomics. The snapshot is served at
//! `GET /metrics` as JSON.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Shared metrics state.
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    pub request_count: Arc<AtomicU64>,
    pub error_count: Arc<AtomicU64>,
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Requests handled.
    pub requests: u64,
    /// Requests answered with a 4xx or 5xx status.
    pub errors: u64,
}

impl ApiMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return current request count.
    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Return current error count.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            errors: self.errors(),
        }
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

/// GET /metrics: current request counters.
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Request counters", body = MetricsSnapshot)),
    tag = "operations"
)]
pub async fn metrics_snapshot(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_app(metrics: ApiMetrics) -> Router {
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route("/fail", get(|| async { StatusCode::BAD_REQUEST }))
            .layer(from_fn(metrics_middleware))
            .layer(Extension(metrics))
    }

    #[tokio::test]
    async fn counts_requests_and_errors() {
        let metrics = ApiMetrics::new();
        let app = test_app(metrics.clone());

        for uri in ["/ok", "/ok", "/fail"] {
            let request = axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            app.clone().oneshot(request).await.unwrap();
        }

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                requests: 3,
                errors: 1
            }
        );
    }

    #[test]
    fn new_metrics_start_at_zero() {
        let metrics = ApiMetrics::default();
        assert_eq!(metrics.requests(), 0);
        assert_eq!(metrics.errors(), 0);
    }
}
