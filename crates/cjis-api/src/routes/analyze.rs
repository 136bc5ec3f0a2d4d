//! # Policy Analysis API
//!
//! Stateless checks: score a policy against one catalog section and return
//! the checklist. Nothing is stored; use [`super::analyses`] for the
//! confirmation workflow.
//!
//! Text arrives either as JSON or as a multipart upload. Uploads go through
//! [`crate::intake`], so the scorer only ever sees non-blank UTF-8 text.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cjis_checker::Checklist;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::intake::{resolve_policy_text, IntakeError, UploadedFile};
use crate::state::AppState;

use super::section_or_default;

/// Request to check inline policy text.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Catalog section; defaults to `authenticator_management`.
    #[serde(default)]
    pub section: Option<String>,
    /// Full policy document text.
    pub policy_text: String,
}

impl Validate for AnalyzeRequest {
    fn validate(&self) -> Result<(), String> {
        if self.policy_text.trim().is_empty() {
            return Err(IntakeError::Empty.to_string());
        }
        Ok(())
    }
}

/// Checklist for one section.
///
/// The checklist keys (`summary`, `criticalIssues`, `requiresConfirmation`,
/// `bySection`) sit at the top level next to `section` and `scorer`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Section the policy was checked against.
    pub section: String,
    /// Scorer that produced the results.
    pub scorer: String,
    /// Aggregated checklist.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub checklist: Checklist,
}

/// Build the analyze router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/analyze", post(analyze))
        .route("/v1/analyze/upload", post(analyze_upload))
}

/// POST /v1/analyze: Check inline policy text.
#[utoipa::path(
    post,
    path = "/v1/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Checklist", body = AnalyzeResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Empty policy or unknown section", body = crate::error::ErrorBody),
    ),
    tag = "analyze"
)]
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let req = extract_validated_json(body)?;
    if req.policy_text.len() > state.config.max_upload_bytes {
        return Err(IntakeError::TooLarge {
            limit: state.config.max_upload_bytes,
        }
        .into());
    }
    let section = section_or_default(req.section.as_deref());
    run_checklist(&state, section, &req.policy_text)
}

/// POST /v1/analyze/upload: Check an uploaded policy document.
///
/// Multipart fields: `file` (document), `policy_text` (inline text used
/// when no file is sent), `section`.
#[utoipa::path(
    post,
    path = "/v1/analyze/upload",
    request_body(content_type = "multipart/form-data", description = "Fields: file, policy_text, section"),
    responses(
        (status = 200, description = "Checklist", body = AnalyzeResponse),
        (status = 400, description = "No input or undecodable text", body = crate::error::ErrorBody),
        (status = 413, description = "Upload too large", body = crate::error::ErrorBody),
        (status = 415, description = "Unsupported document format", body = crate::error::ErrorBody),
        (status = 422, description = "Empty policy or unknown section", body = crate::error::ErrorBody),
    ),
    tag = "analyze"
)]
pub async fn analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut multipart = multipart.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let form = read_form(&mut multipart).await?;

    let text = resolve_policy_text(
        form.file.as_ref(),
        form.policy_text.as_deref(),
        state.config.max_upload_bytes,
    )?;
    if let Some(file) = &form.file {
        tracing::info!(filename = %file.filename, bytes = file.bytes.len(), "received policy upload");
    }

    let section = section_or_default(form.section.as_deref());
    run_checklist(&state, section, &text)
}

fn run_checklist(
    state: &AppState,
    section: String,
    text: &str,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let checklist = state.checker.checklist(&section, text)?;
    Ok(Json(AnalyzeResponse {
        section,
        scorer: state.checker.scorer_name().to_string(),
        checklist,
    }))
}

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    policy_text: Option<String>,
    section: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            Some("policy_text") => {
                form.policy_text = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("section") => {
                form.section = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::debug!(field = ?other, "ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
