//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Login and the health check are open;
//! everything else requires a bearer token issued at login.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer); endpoint handlers use `State<ApiContext>` via `with_state`.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the API router.
pub fn api_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state);
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // Protected routes — require a live session token.
    let protected = Router::new()
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/users", post(endpoints::auth::create_user))
        .route("/contracts/extract", post(endpoints::contracts::extract))
        .route("/contracts", post(endpoints::contracts::store))
        .route("/contracts", get(endpoints::contracts::search))
        .route("/contracts/stats", get(endpoints::contracts::stats))
        .route("/contracts/:id", get(endpoints::contracts::detail))
        .route("/contracts/:id", delete(endpoints::contracts::remove))
        .route("/contracts/:id/file", get(endpoints::contracts::file))
        .route("/contracts/:id/cedula", get(endpoints::contracts::cedula))
        .route("/annexes", get(endpoints::annexes::list))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the middleware can extract ApiContext.
        .layer(axum::Extension(ctx.clone()));

    // Unprotected routes.
    let unprotected = Router::new()
        .route("/auth/login", post(endpoints::auth::login))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx.clone())
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .layer(CorsLayer::permissive())
}
