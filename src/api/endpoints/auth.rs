//! Login and logout against the flat credentials file.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CurrentUser};

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "usuario")]
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "nombre")]
    pub display_name: String,
    #[serde(rename = "nivel")]
    pub role: String,
    pub area: String,
}

/// `POST /api/auth/login` — check credentials, issue a session token.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = crate::auth::authenticate(
        &ctx.state.paths.users_file,
        &payload.username,
        &payload.password,
    )
    .ok_or(ApiError::Unauthorized)?;

    let response = LoginResponse {
        display_name: user.display_name.clone(),
        role: user.role.clone(),
        area: user.area.clone(),
        token: ctx.state.sessions.issue(user),
    };
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct CreateUserResponse {
    pub created: bool,
    #[serde(rename = "usuario")]
    pub username: String,
}

/// `POST /api/users` — register a new account (admin only).
pub async fn create_user(
    State(ctx): State<ApiContext>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Json(account): Json<crate::models::UserAccount>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    if !caller.is_admin() {
        return Err(ApiError::Forbidden);
    }
    if account.username.trim().is_empty() || account.password.is_empty() {
        return Err(ApiError::BadRequest("Usuario y contraseña requeridos".into()));
    }

    let username = account.username.clone();
    crate::auth::create_user(&ctx.state.paths.users_file, account).map_err(|e| match e {
        crate::auth::AuthError::DuplicateUser(u) => {
            ApiError::Conflict(format!("Ya existe el usuario {u}"))
        }
        other => ApiError::Internal(other.to_string()),
    })?;

    Ok(Json(CreateUserResponse {
        created: true,
        username,
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// `POST /api/auth/logout` — revoke the calling session's token.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    headers: axum::http::HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let logged_out = ctx.state.sessions.revoke(token);
    tracing::info!(username = %user.username, "Session closed");
    Ok(Json(LogoutResponse { logged_out }))
}
