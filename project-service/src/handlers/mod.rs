//! HTTP handlers for project-service.

pub mod attachments;
pub mod dashboard;
pub mod financials;
pub mod projects;

use crate::models::Project;
use crate::services::financials::project_summary;
use crate::services::get_metrics;
use crate::dtos::ProjectResponse;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Does not touch the database.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "project-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: the database must answer.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => {
            tracing::debug!("Readiness check passed");
            (StatusCode::OK, Json(json!({ "status": "ready" })))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed - database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": e.to_string() })),
            )
        }
    }
}

/// Metrics endpoint for Prometheus scraping.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Project plus its freshly computed financials.
///
/// Not counted in the summary metric; only the financials endpoints are.
pub(crate) fn project_response(project: Project) -> ProjectResponse {
    let financials = project_summary(&project);
    ProjectResponse::new(project, financials)
}
