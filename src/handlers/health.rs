// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{error::AppError, openapi::ApiDoc};

/// Liveness banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn index() -> &'static str {
    "SQI Engine is Running..."
}

/// Serves the OpenAPI document for this service.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

pub async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
