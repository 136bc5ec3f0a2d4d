//! # Analyses & Auditor Review API
//!
//! Stored analyses for the confirmation workflow:
//!
//! ```text
//! POST /v1/analyses                                      score and store
//! GET  /v1/analyses                                      list, newest first
//! GET  /v1/analyses/{id}                                 checklist with confirmations
//! DELETE /v1/analyses/{id}                               drop analysis and decisions
//! PUT  /v1/analyses/{id}/confirmations/{requirement_id}  record a decision
//! GET  /v1/analyses/{id}/report                          final report
//! ```
//!
//! Scored results are stored once and never modified. Confirmations are
//! kept in [`cjis_checker::ConfirmationStore`] and overlaid on read. At most
//! `max_analyses` are kept; the oldest is evicted with its confirmations.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use cjis_checker::{aggregate, Checklist, FinalReport};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json};
use crate::intake::IntakeError;
use crate::state::{AnalysisRecord, AppState};

use super::analyze::AnalyzeRequest;
use super::section_or_default;

/// A stored analysis with its current checklist.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Analysis id.
    pub id: Uuid,
    /// Section the policy was checked against.
    pub section: String,
    /// Hex SHA-256 of the analyzed text.
    pub document_digest: String,
    /// Scorer that produced the results.
    pub scorer: String,
    /// When the analysis ran.
    pub created_at: DateTime<Utc>,
    /// Checklist with recorded confirmations applied, flattened.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub checklist: Checklist,
}

/// Listing entry for a stored analysis.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Analysis id.
    pub id: Uuid,
    /// Section the policy was checked against.
    pub section: String,
    /// Hex SHA-256 of the analyzed text.
    pub document_digest: String,
    /// When the analysis ran.
    pub created_at: DateTime<Utc>,
    /// Requirements checked.
    pub total: usize,
    /// Decisions recorded so far.
    pub confirmations: usize,
}

/// Auditor decision on one requirement.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Whether the auditor confirms the finding.
    pub confirmed: bool,
    /// Optional auditor notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Recorded decision.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    /// Analysis id.
    pub analysis_id: Uuid,
    /// Requirement id.
    pub requirement_id: String,
    /// Recorded decision.
    pub confirmed: bool,
    /// Recorded notes.
    pub notes: String,
    /// When the decision was recorded.
    pub updated_at: DateTime<Utc>,
}

/// Build the analyses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/analyses", post(create_analysis).get(list_analyses))
        .route("/v1/analyses/{id}", get(get_analysis).delete(delete_analysis))
        .route(
            "/v1/analyses/{id}/confirmations/{requirement_id}",
            put(confirm_requirement),
        )
        .route("/v1/analyses/{id}/report", get(get_report))
}

fn document_digest(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn find_analysis(state: &AppState, id: Uuid) -> Result<AnalysisRecord, AppError> {
    state
        .analyses
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("analysis {id} not found")))
}

fn analysis_response(state: &AppState, record: &AnalysisRecord) -> AnalysisResponse {
    AnalysisResponse {
        id: record.id,
        section: record.section.clone(),
        document_digest: record.document_digest.clone(),
        scorer: record.scorer.to_string(),
        created_at: record.created_at,
        checklist: aggregate(&state.reviewed_results(record)),
    }
}

/// POST /v1/analyses: Score a policy and store the analysis.
#[utoipa::path(
    post,
    path = "/v1/analyses",
    request_body = AnalyzeRequest,
    responses(
        (status = 201, description = "Analysis stored", body = AnalysisResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Empty policy or unknown section", body = crate::error::ErrorBody),
    ),
    tag = "analyses"
)]
pub async fn create_analysis(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnalysisResponse>), AppError> {
    let req = extract_validated_json(body)?;
    if req.policy_text.len() > state.config.max_upload_bytes {
        return Err(IntakeError::TooLarge {
            limit: state.config.max_upload_bytes,
        }
        .into());
    }
    let section = section_or_default(req.section.as_deref());
    let results = state.checker.check_section(&section, &req.policy_text)?;

    let record = AnalysisRecord {
        id: Uuid::new_v4(),
        section,
        document_digest: document_digest(&req.policy_text),
        scorer: state.checker.scorer_name(),
        created_at: Utc::now(),
        results: Arc::new(results),
    };
    state.store_analysis(record.clone());

    tracing::info!(
        analysis_id = %record.id,
        section = %record.section,
        digest = %record.document_digest,
        "stored analysis"
    );
    Ok((StatusCode::CREATED, Json(analysis_response(&state, &record))))
}

/// GET /v1/analyses: List stored analyses, newest first.
#[utoipa::path(
    get,
    path = "/v1/analyses",
    responses((status = 200, description = "Stored analyses", body = Vec<AnalysisSummary>)),
    tag = "analyses"
)]
pub async fn list_analyses(State(state): State<AppState>) -> Json<Vec<AnalysisSummary>> {
    let mut records = state.analyses.list();
    records.sort_by_key(|r| std::cmp::Reverse(r.age_key()));
    Json(
        records
            .into_iter()
            .map(|r| AnalysisSummary {
                confirmations: state.confirmations.count_for(r.id),
                total: r.results.len(),
                id: r.id,
                section: r.section,
                document_digest: r.document_digest,
                created_at: r.created_at,
            })
            .collect(),
    )
}

/// GET /v1/analyses/{id}: Current checklist for a stored analysis.
#[utoipa::path(
    get,
    path = "/v1/analyses/{id}",
    params(("id" = Uuid, Path, description = "Analysis ID")),
    responses(
        (status = 200, description = "Analysis found", body = AnalysisResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "analyses"
)]
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let record = find_analysis(&state, id)?;
    Ok(Json(analysis_response(&state, &record)))
}

/// DELETE /v1/analyses/{id}: Drop a stored analysis and its confirmations.
#[utoipa::path(
    delete,
    path = "/v1/analyses/{id}",
    params(("id" = Uuid, Path, description = "Analysis ID")),
    responses(
        (status = 204, description = "Analysis removed"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "analyses"
)]
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .remove_analysis(id)
        .ok_or_else(|| AppError::NotFound(format!("analysis {id} not found")))?;
    tracing::info!(analysis_id = %id, "removed analysis");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/analyses/{id}/confirmations/{requirement_id}: Record an auditor decision.
#[utoipa::path(
    put,
    path = "/v1/analyses/{id}/confirmations/{requirement_id}",
    params(
        ("id" = Uuid, Path, description = "Analysis ID"),
        ("requirement_id" = String, Path, description = "Requirement ID"),
    ),
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Decision recorded", body = ConfirmationResponse),
        (status = 404, description = "Unknown analysis or requirement", body = crate::error::ErrorBody),
    ),
    tag = "analyses"
)]
pub async fn confirm_requirement(
    State(state): State<AppState>,
    Path((id, requirement_id)): Path<(Uuid, String)>,
    body: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let req = extract_json(body)?;
    let record = find_analysis(&state, id)?;
    let confirmation = state.confirmations.confirm(
        id,
        &record.results,
        &requirement_id,
        req.confirmed,
        req.notes.as_deref().unwrap_or_default(),
    )?;
    // The analysis may have been evicted or deleted since it was looked up.
    if state.analyses.get(&id).is_none() {
        state.confirmations.remove_analysis(id);
        return Err(AppError::NotFound(format!("analysis {id} not found")));
    }

    Ok(Json(ConfirmationResponse {
        analysis_id: id,
        requirement_id,
        confirmed: confirmation.confirmed,
        notes: confirmation.notes,
        updated_at: confirmation.updated_at,
    }))
}

/// GET /v1/analyses/{id}/report: Final audit report.
#[utoipa::path(
    get,
    path = "/v1/analyses/{id}/report",
    params(("id" = Uuid, Path, description = "Analysis ID")),
    responses(
        (status = 200, description = "Final report"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "analyses"
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinalReport>, AppError> {
    let record = find_analysis(&state, id)?;
    let results = state.reviewed_results(&record);
    Ok(Json(FinalReport::build(&record.section, &results)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_lowercase_sha256_hex() {
        assert_eq!(
            document_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_analysis_is_not_found() {
        let state = AppState::new();
        assert!(matches!(
            find_analysis(&state, Uuid::new_v4()),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_breaks_timestamp_ties_by_id() {
        let state = AppState::new();
        let created_at = Utc::now();
        let mut ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            state.store_analysis(AnalysisRecord {
                id: *id,
                section: "authenticator_management".into(),
                document_digest: document_digest("same"),
                scorer: "keyword",
                created_at,
                results: Arc::new(Vec::new()),
            });
        }
        ids.sort_by(|a, b| b.cmp(a));

        for _ in 0..3 {
            let Json(listed) = list_analyses(State(state.clone())).await;
            let listed: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
            assert_eq!(listed, ids);
        }
    }
}
