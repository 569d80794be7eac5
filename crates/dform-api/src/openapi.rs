//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "dform API",
        description = "Serves dynamic form field descriptors and validates submissions against the schema derived from them."
    ),
    paths(
        crate::routes::form::get_form_structure,
        crate::routes::form::submit_form,
    ),
    components(
        schemas(
            dform_core::FieldDescriptor,
            dform_core::ValidationBounds,
            dform_core::SelectOption,
            dform_core::DependsOn,
            dform_core::FieldValue,
            dform_core::FormValues,
            crate::routes::form::SubmissionAccepted,
            crate::routes::form::SubmissionRejected,
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "form", description = "Form structure and submission"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
