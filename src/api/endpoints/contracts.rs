//! Contract endpoints: extraction, archive and the cédula deliverable.
//!
//! `POST /api/contracts/extract` runs the acquisition + parsing pipeline and
//! returns the result without persisting; `POST /api/contracts` archives a
//! record with its original file. Extraction failures are reported in-band
//! (`status`/`detail`) so the client can offer manual capture, mirroring the
//! legacy marker-string protocol.

use std::path::Path;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CurrentUser};
use crate::db::repository::{
    contract_stats, delete_contract, file_digest, get_contract, get_contract_file,
    insert_contract, search_contracts,
};
use crate::models::{ContractFilters, ContractRecord, ContractStats, StoredContract};
use crate::pipeline::extraction::{Acquired, DocumentKind};
use crate::pipeline::parse::extract_contract_data;
use crate::render::{render_cedula, render_cedula_bytes};

/// Upload ceiling (the archive stores originals inline).
const MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub file_name: String,
    /// Base64 payload, plain or as a data URL.
    pub data: String,
    /// Overrides the kind inferred from the file name.
    pub kind: Option<DocumentKind>,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    /// `"ok"`, `"empty"` or `"error"` — the typed form of the legacy
    /// `[INFO]`/`[ERROR]` markers.
    pub status: &'static str,
    pub detail: Option<String>,
    pub raw_text: String,
    pub record: ContractRecord,
}

/// `POST /api/contracts/extract` — acquire text and parse it; persists nothing.
pub async fn extract(
    State(ctx): State<ApiContext>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let bytes = decode_base64_payload(&payload.data)?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Archivo vacío".into()));
    }
    if bytes.len() > MAX_FILE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "El archivo excede el límite de {} MB",
            MAX_FILE_BYTES / (1024 * 1024)
        )));
    }

    let kind = payload
        .kind
        .unwrap_or_else(|| DocumentKind::from_path(Path::new(&payload.file_name)));

    // Stage on disk: acquisition works on paths, and the temp copy lands in
    // the same uploads dir the legacy flow used.
    let staged = ctx.state.paths.uploads_dir.join(format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(&payload.file_name)
    ));
    crate::storage::save_upload(&bytes, &staged)
        .map_err(|e| ApiError::Internal(format!("staging upload: {e}")))?;

    tracing::info!(
        username = %user.username,
        file_name = %payload.file_name,
        kind = kind.as_str(),
        size = bytes.len(),
        "Extraction requested"
    );

    let state = ctx.state.clone();
    let staged_for_task = staged.clone();
    let result = tokio::task::spawn_blocking(move || {
        state.extractor.extract(&staged_for_task, kind)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("extraction task: {e}")))?;

    let _ = std::fs::remove_file(&staged);

    let empty_record = ContractRecord {
        area: ctx.state.area.clone(),
        ..Default::default()
    };

    let response = match result {
        Ok(Acquired::Text(raw_text)) => {
            let record = extract_contract_data(&raw_text, &ctx.state.vocabulary, &ctx.state.area);
            ctx.state.save_vocabulary();
            ExtractResponse {
                status: "ok",
                detail: None,
                raw_text,
                record,
            }
        }
        Ok(Acquired::Empty { detail }) => ExtractResponse {
            status: "empty",
            detail: Some(detail),
            raw_text: String::new(),
            record: empty_record,
        },
        Err(e) => {
            tracing::warn!(error = %e, file_name = %payload.file_name, "Acquisition failed");
            ExtractResponse {
                status: "error",
                detail: Some(e.to_string()),
                raw_text: String::new(),
                record: empty_record,
            }
        }
    };

    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct StoreRequest {
    pub record: ContractRecord,
    pub file_name: String,
    /// Base64 payload, plain or as a data URL.
    pub data: String,
    pub file_type: Option<String>,
}

#[derive(Serialize)]
pub struct StoreResponse {
    pub id: Uuid,
    pub contract_number: String,
    /// Where the cédula deliverable was written, when rendering succeeded.
    pub cedula_path: Option<String>,
}

/// `POST /api/contracts` — archive a record with its original file and
/// render the cédula into the contract's folder tree.
pub async fn store(
    State(ctx): State<ApiContext>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<StoreRequest>,
) -> Result<Json<StoreResponse>, ApiError> {
    if payload.record.contract_number.is_empty() {
        return Err(ApiError::BadRequest("Número de contrato requerido".into()));
    }

    let bytes = decode_base64_payload(&payload.data)?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Archivo vacío".into()));
    }

    let file_type = payload.file_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&payload.file_name)
            .first_or_octet_stream()
            .to_string()
    });

    let stored = StoredContract::from_record(
        &payload.record,
        &payload.file_name,
        Some(&file_type),
        bytes.len() as i64,
        &file_digest(&bytes),
        &user.username,
    );

    {
        let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
        insert_contract(&conn, &stored, &bytes)?;
    }

    // Folder tree + deliverable are best-effort: the archive row is the
    // source of truth, the cédula can be regenerated on demand.
    let cedula_path = match crate::storage::contract_dirs(
        &ctx.state.paths.output_dir,
        &user.username,
        &stored.contract_number,
    ) {
        Ok(dirs) => {
            let path = dirs
                .cedula
                .join(format!("CEDULA_{}.xlsx", stored.contract_number));
            match render_cedula(&payload.record, &path) {
                Ok(()) => Some(path.display().to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "Cédula rendering failed");
                    None
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Contract folder creation failed");
            None
        }
    };

    Ok(Json(StoreResponse {
        id: stored.id,
        contract_number: stored.contract_number,
        cedula_path,
    }))
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub contracts: Vec<StoredContract>,
    pub count: usize,
}

/// `GET /api/contracts` — filtered search, newest first.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(filters): Query<ContractFilters>,
) -> Result<Json<SearchResponse>, ApiError> {
    let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
    let contracts = search_contracts(&conn, &filters)?;
    let count = contracts.len();
    Ok(Json(SearchResponse { contracts, count }))
}

/// `GET /api/contracts/:id` — one contract's metadata.
pub async fn detail(
    State(ctx): State<ApiContext>,
    UrlPath(id): UrlPath<Uuid>,
) -> Result<Json<StoredContract>, ApiError> {
    let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
    get_contract(&conn, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Contract {id} not found")))
}

/// `GET /api/contracts/:id/file` — download the original document.
pub async fn file(
    State(ctx): State<ApiContext>,
    UrlPath(id): UrlPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let file = {
        let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
        get_contract_file(&conn, &id)?
    }
    .ok_or_else(|| ApiError::NotFound(format!("Contract {id} not found")))?;

    let content_type = file.file_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&file.file_name)
            .first_or_octet_stream()
            .to_string()
    });
    let disposition = format!(
        "attachment; filename=\"{}\"",
        sanitize_file_name(&file.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    ))
}

/// `DELETE /api/contracts/:id`.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    UrlPath(id): UrlPath<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    {
        let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
        delete_contract(&conn, &id)?;
    }
    tracing::info!(contract_id = %id, username = %user.username, "Contract removed");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// `GET /api/contracts/stats`.
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<ContractStats>, ApiError> {
    let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
    Ok(Json(contract_stats(&conn)?))
}

/// `GET /api/contracts/:id/cedula` — render and download the deliverable.
pub async fn cedula(
    State(ctx): State<ApiContext>,
    UrlPath(id): UrlPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let contract = {
        let conn = ctx.state.db.lock().unwrap_or_else(|e| e.into_inner());
        get_contract(&conn, &id)?
    }
    .ok_or_else(|| ApiError::NotFound(format!("Contract {id} not found")))?;

    let bytes = render_cedula_bytes(&contract.record())?;
    let disposition = format!(
        "attachment; filename=\"CEDULA_{}.xlsx\"",
        sanitize_file_name(&contract.contract_number)
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Decode a base64 payload that may arrive as a `data:` URL.
fn decode_base64_payload(data: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = match data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ApiError::BadRequest(format!("Archivo mal codificado: {e}")))
}

/// Keep file names header- and filesystem-safe.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "archivo".to_string()
    } else {
        cleaned
    }
}
