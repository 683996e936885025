//! Known-annex vocabulary endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct AnnexesResponse {
    pub annexes: Vec<String>,
    pub count: usize,
}

/// `GET /api/annexes` — current vocabulary snapshot, sorted ascending.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<AnnexesResponse>, ApiError> {
    let annexes = ctx.state.vocabulary.snapshot();
    let count = annexes.len();
    Ok(Json(AnnexesResponse { annexes, count }))
}
