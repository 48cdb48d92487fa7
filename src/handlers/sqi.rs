// src/handlers/sqi.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{DIAGNOSTIC_PROMPT_VERSION, ENGINE_VERSION, UNKNOWN_STUDENT_ID},
    error::{AppError, ErrorResponse},
    models::sqi::{ComputeSqiRequest, ComputeSqiResponse, ReportMetadata},
    scoring::ScoringEngine,
};

/// Computes the Student Quality Index for one student's attempts.
///
/// * Rejects a missing, non-array or empty `attempts` list with 400.
/// * Scores the attempts with the shared engine.
/// * Wraps the report with the student id and response metadata.
#[utoipa::path(
    post,
    path = "/api/compute-sqi",
    request_body = ComputeSqiRequest,
    responses(
        (status = 200, description = "SQI computed", body = ComputeSqiResponse),
        (status = 400, description = "Missing, non-array or empty attempts", body = ErrorResponse),
        (status = 500, description = "Scoring failed", body = ErrorResponse)
    )
)]
pub async fn compute_sqi(
    State(engine): State<Arc<ScoringEngine>>,
    payload: Result<Json<ComputeSqiRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let attempts = payload.attempts.unwrap_or_default();
    let student_id = payload
        .student_id
        .unwrap_or_else(|| UNKNOWN_STUDENT_ID.to_string());

    let report = engine.compute(&attempts)?;

    tracing::info!(
        student_id = %student_id,
        attempts = attempts.len(),
        overall_sqi = report.overall_sqi,
        "Computed SQI"
    );

    Ok(Json(ComputeSqiResponse {
        student_id,
        report,
        metadata: ReportMetadata {
            diagnostic_prompt_version: DIAGNOSTIC_PROMPT_VERSION.to_string(),
            computed_at: Utc::now(),
            engine: ENGINE_VERSION.to_string(),
        },
    }))
}
