//! # dform-api — Axum Descriptor Service
//!
//! Serves the descriptor list that drives a dynamic form and validates
//! submissions against the schema derived from it.
//!
//! ## API Surface
//!
//! | Route | Module | Purpose |
//! |---|---|---|
//! | `GET /api/form-structure` | [`routes::form`] | descriptor list |
//! | `POST /api/form-submit` | [`routes::form`] | validate a submission |
//! | `GET /openapi.json` | [`openapi`] | OpenAPI spec |
//! | `GET /health/*` | this module | liveness and readiness probes |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → DefaultBodyLimit → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers; validation lives in `dform-schema`.
//! - All request errors map to structured JSON bodies via `AppError`.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod sample;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Submissions are flat maps of scalars; 64 KiB is generous.
const BODY_LIMIT: usize = 64 * 1024;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::form::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. State is only constructed after descriptors load and the
/// schema is built, so a serving process is ready.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "fields": state.descriptors.len(),
        "repairs": state.descriptors.issues().len(),
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
