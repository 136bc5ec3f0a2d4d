//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CJIS Policy Auditor API",
        version = "0.1.0",
        description = "Checks agency security policies against CJIS Security Policy requirements and supports auditor review of the findings.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Catalog
        crate::routes::sections::list_sections,
        crate::routes::sections::get_section,
        // Stateless checks
        crate::routes::analyze::analyze,
        crate::routes::analyze::analyze_upload,
        // Auditor review
        crate::routes::analyses::create_analysis,
        crate::routes::analyses::list_analyses,
        crate::routes::analyses::get_analysis,
        crate::routes::analyses::delete_analysis,
        crate::routes::analyses::confirm_requirement,
        crate::routes::analyses::get_report,
        // Operations
        crate::middleware::metrics::metrics_snapshot,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::middleware::metrics::MetricsSnapshot,
        crate::routes::sections::SectionSummary,
        crate::routes::sections::SectionListResponse,
        crate::routes::sections::SectionDetailResponse,
        crate::routes::analyze::AnalyzeRequest,
        crate::routes::analyze::AnalyzeResponse,
        crate::routes::analyses::AnalysisResponse,
        crate::routes::analyses::AnalysisSummary,
        crate::routes::analyses::ConfirmRequest,
        crate::routes::analyses::ConfirmationResponse,
    )),
    tags(
        (name = "sections", description = "Requirement catalog"),
        (name = "analyze", description = "Stateless policy checks"),
        (name = "analyses", description = "Stored analyses and auditor confirmation"),
        (name = "operations", description = "Operational counters"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
