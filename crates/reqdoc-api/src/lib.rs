//! # reqdoc-api: Compliance Requirement & Document Service
//!
//! Tracks compliance requirements, the documents that support them, and
//! each document's version history of uploaded files.
//!
//! ## API Surface
//!
//! | Path                                   | Module                      |
//! |----------------------------------------|-----------------------------|
//! | `/requirements`                        | [`routes::requirements`]    |
//! | `/documents`, `/documents/*`           | [`routes::documents`]       |
//! | `/upload-csv`                          | [`routes::import`]          |
//! | `/openapi.json`                        | [`openapi`]                 |
//! | `/health/liveness`, `/health/readiness`| this module                 |
//!
//! ## Layers
//!
//! ```text
//! routes (HTTP) → service (validation, numbering) → store::Repository → db (Postgres) | memory
//! ```
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → DefaultBodyLimit → Handler
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod import;
pub mod middleware;
pub mod openapi;
pub mod records;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod uploads;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors::layer(&state.config.cors);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    let api = Router::new()
        .merge(routes::requirements::router())
        .merge(routes::documents::router())
        .merge(routes::import::router())
        .merge(openapi::router())
        .layer(body_limit);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(middleware::tracing_layer::layer())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the storage backend answers.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    match state.repository.ping().await {
        Ok(()) => Ok("ready"),
        Err(err) => {
            tracing::warn!(
                backend = state.repository.backend_name(),
                error = %err,
                "readiness check failed"
            );
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
