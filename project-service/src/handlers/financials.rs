//! Financial summary endpoints.

use crate::dtos::{BreakdownResponse, FinancialsRequest};
use crate::models::ProjectFinancials;
use crate::services::financials::{
    calculate_material_summary, calculate_project_summary, installed_ac_units, item_breakdown,
    project_summary,
};
use crate::services::{record_error, record_summary};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

/// Summarise line items supplied in the request body. No database access.
pub async fn summarize(Json(payload): Json<FinancialsRequest>) -> Json<ProjectFinancials> {
    let (materials, services, ac_units) = payload.into_parts();
    let summary = calculate_project_summary(&materials, &services, &ac_units);
    record_summary(summary.is_profitable);

    tracing::debug!(
        items = materials.len() + services.len() + ac_units.len(),
        profit_loss = %summary.profit_loss,
        "Financial summary computed"
    );

    Json(summary)
}

/// Summary plus per-line rows, material tracker totals and AC unit inventory.
pub async fn breakdown(Json(payload): Json<FinancialsRequest>) -> Json<BreakdownResponse> {
    let (materials, services, ac_units) = payload.into_parts();
    let summary = calculate_project_summary(&materials, &services, &ac_units);
    record_summary(summary.is_profitable);

    Json(BreakdownResponse {
        summary,
        material_summary: calculate_material_summary(&materials, &services),
        items: item_breakdown(&materials, &services, &ac_units),
        ac_units: installed_ac_units(&ac_units),
    })
}

/// Financials of a stored project, recomputed on every read.
#[tracing::instrument(skip(state))]
pub async fn project_financials(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectFinancials>, AppError> {
    let project = state
        .db
        .get_project(project_id)
        .await
        .inspect_err(|e| record_error(e.kind()))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;

    let summary = project_summary(&project);
    record_summary(summary.is_profitable);

    Ok(Json(summary))
}
