//! HTTP API for the web UI collaborator.
//!
//! Routes are nested under `/api/` and, except for login and the health
//! check, protected by bearer-token auth issued at login. The router is
//! composable — `api_router()` returns a `Router` that can be mounted on
//! any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
