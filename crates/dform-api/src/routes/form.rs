//! # Form Routes
//!
//! Routes:
//! - GET  /api/form-structure — the descriptor list, in display order
//! - POST /api/form-submit — validate a submission against the derived schema
//!
//! Submissions are validated and acknowledged. Nothing is stored.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use dform_core::{FieldDescriptor, FormValues};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Response for an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAccepted {
    /// Always `true`.
    pub success: bool,
    /// Validated values: declared fields only, numbers normalized.
    pub data: FormValues,
    pub submission_id: Uuid,
    pub received_at: DateTime<Utc>,
}

/// Response for a rejected submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRejected {
    /// Always `false`.
    pub success: bool,
    /// One message per failing field.
    pub errors: BTreeMap<String, String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/form-structure", get(get_form_structure))
        .route("/api/form-submit", post(submit_form))
}

/// GET /api/form-structure — Return the field descriptors.
#[utoipa::path(
    get,
    path = "/api/form-structure",
    responses(
        (status = 200, description = "Field descriptors in display order", body = Vec<FieldDescriptor>),
    ),
    tag = "form"
)]
pub(crate) async fn get_form_structure(State(state): State<AppState>) -> Json<Vec<FieldDescriptor>> {
    Json(state.descriptors.fields().to_vec())
}

/// POST /api/form-submit — Validate submitted values.
///
/// Returns 200 with the cleaned values on success and 422 with one message
/// per failing field otherwise.
#[utoipa::path(
    post,
    path = "/api/form-submit",
    request_body = FormValues,
    responses(
        (status = 200, description = "Submission accepted", body = SubmissionAccepted),
        (status = 422, description = "Field validation failed", body = SubmissionRejected),
    ),
    tag = "form"
)]
pub(crate) async fn submit_form(
    State(state): State<AppState>,
    body: Result<Json<FormValues>, JsonRejection>,
) -> Result<Response, AppError> {
    let values = extract_json(body)?;

    match state.schema.validate(&values) {
        Ok(data) => {
            let accepted = SubmissionAccepted {
                success: true,
                data,
                submission_id: Uuid::new_v4(),
                received_at: Utc::now(),
            };
            tracing::info!(
                submission_id = %accepted.submission_id,
                fields = accepted.data.len(),
                "form submission accepted"
            );
            Ok((StatusCode::OK, Json(accepted)).into_response())
        }
        Err(errors) => {
            tracing::info!(failed = ?errors.fields(), "form submission rejected");
            let rejected = SubmissionRejected {
                success: false,
                errors: errors.messages(),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(rejected)).into_response())
        }
    }
}
