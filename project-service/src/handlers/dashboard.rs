use super::projects::parse_status_filter;
use crate::dtos::{DashboardResponse, ListProjectsQuery};
use crate::models::ListProjectsFilter;
use crate::services::dashboard::{dashboard_statistics, filter_projects, map_markers};
use crate::services::financials::portfolio_financials;
use crate::services::record_error;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

/// Statistics over every project; portfolio totals and markers over the
/// filtered set.
#[tracing::instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let status = parse_status_filter(query.status.as_deref())?;

    let projects = state
        .db
        .list_projects(&ListProjectsFilter::default())
        .await
        .inspect_err(|e| record_error(e.kind()))?;

    let statistics = dashboard_statistics(&projects);
    let visible = filter_projects(&projects, status, query.q.as_deref());

    tracing::debug!(
        total = statistics.total_projects,
        visible = visible.len(),
        "Dashboard assembled"
    );

    Ok(Json(DashboardResponse {
        statistics,
        portfolio: portfolio_financials(visible.iter().copied()),
        markers: map_markers(visible),
    }))
}
