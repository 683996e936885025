//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub known_annexes: usize,
    pub version: &'static str,
}

/// `GET /api/health` — connection check for the web client.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        known_annexes: ctx.state.vocabulary.len(),
        version: crate::config::APP_VERSION,
    }))
}
