//! # Catalog Browsing API
//!
//! Read-only views of the requirement catalog loaded at startup.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use cjis_core::{CatalogError, Requirement};

use crate::error::AppError;
use crate::state::AppState;

/// One catalog section and its size.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    /// Section name, e.g. `media_protection`.
    pub name: String,
    /// Requirements in the section.
    pub requirement_count: usize,
    /// Requirements marked critical.
    pub critical_count: usize,
}

/// Catalog listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionListResponse {
    /// Sections sorted by name.
    pub sections: Vec<SectionSummary>,
    /// Section used when a request names none.
    pub default_section: String,
}

/// Requirements of one section.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetailResponse {
    /// Section name.
    pub name: String,
    /// Requirements in catalog order.
    #[schema(value_type = Vec<Object>)]
    pub requirements: Vec<Requirement>,
}

/// Build the sections router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sections", get(list_sections))
        .route("/v1/sections/{name}", get(get_section))
}

/// GET /v1/sections: List catalog sections.
#[utoipa::path(
    get,
    path = "/v1/sections",
    responses((status = 200, description = "Catalog sections", body = SectionListResponse)),
    tag = "sections"
)]
pub async fn list_sections(State(state): State<AppState>) -> Result<Json<SectionListResponse>, AppError> {
    let catalog = state.checker.catalog();
    let mut sections = Vec::new();
    for name in catalog.sections() {
        let requirements = catalog.requirements_for_section(name)?;
        sections.push(SectionSummary {
            name: name.to_string(),
            requirement_count: requirements.len(),
            critical_count: requirements.iter().filter(|r| r.critical).count(),
        });
    }
    Ok(Json(SectionListResponse {
        sections,
        default_section: cjis_core::DEFAULT_SECTION.to_string(),
    }))
}

/// GET /v1/sections/{name}: Requirements of one section.
#[utoipa::path(
    get,
    path = "/v1/sections/{name}",
    params(("name" = String, Path, description = "Section name")),
    responses(
        (status = 200, description = "Section requirements", body = SectionDetailResponse),
        (status = 404, description = "Unknown section", body = crate::error::ErrorBody),
    ),
    tag = "sections"
)]
pub async fn get_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SectionDetailResponse>, AppError> {
    let requirements = state
        .checker
        .catalog()
        .requirements_for_section(&name)
        .map_err(|err: CatalogError| AppError::NotFound(err.to_string()))?;

    Ok(Json(SectionDetailResponse {
        name,
        requirements: requirements.iter().map(|r| Requirement::clone(r)).collect(),
    }))
}
