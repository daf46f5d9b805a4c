//! Project CRUD, line items and AC unit endpoints.

use super::project_response;
use crate::dtos::{
    CreateProjectRequest, LineItemsRequest, ListProjectsQuery, ProjectListResponse,
    ProjectResponse, UpdateProjectRequest,
};
use crate::models::{
    CreateProject, LineItem, ListProjectsFilter, ProjectStatus, ReplaceLineItems, UpdateProject,
};
use crate::services::collections::{remove_at, upsert_ac_unit};
use crate::services::{record_error, record_project_operation};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

/// Status filter from a query string. Absent or `all` means no filter.
pub(crate) fn parse_status_filter(raw: Option<&str>) -> Result<Option<ProjectStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => ProjectStatus::parse(value).map(Some).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Unknown project status '{}'", value))
        }),
    }
}

fn not_found(project_id: Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Project {} not found", project_id))
}

/// Record the outcome of a project operation and pass the result through.
fn track<T>(operation: &str, result: Result<T, AppError>) -> Result<T, AppError> {
    match &result {
        Ok(_) => record_project_operation(operation, "success"),
        Err(e) => {
            record_project_operation(operation, "error");
            record_error(e.kind());
        }
    }
    result
}

#[tracing::instrument(skip(state, payload), fields(project_name = %payload.project_name))]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    payload.validate_all()?;

    let input = CreateProject {
        project_name: payload.project_name.trim().to_string(),
        client: payload.client.trim().to_string(),
        phone: payload.phone,
        description: payload.description,
        status: payload.status.unwrap_or_default(),
        location: payload.location.into(),
        materials: payload.materials.unwrap_or_default(),
        services: payload.services.unwrap_or_default(),
        created_by: payload.created_by.unwrap_or_else(|| "unknown".to_string()),
    };

    let project = track("create", state.db.create_project(&input).await)?;

    Ok((StatusCode::CREATED, Json(project_response(project))))
}

#[tracing::instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let filter = ListProjectsFilter {
        status: parse_status_filter(query.status.as_deref())?,
        query: query.q,
    };

    let projects = track("list", state.db.list_projects(&filter).await)?;
    let projects: Vec<ProjectResponse> = projects.into_iter().map(project_response).collect();

    Ok(Json(ProjectListResponse {
        count: projects.len(),
        projects,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = track("get", state.db.get_project(project_id).await)?
        .ok_or_else(|| not_found(project_id))?;

    Ok(Json(project_response(project)))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    payload.validate_all()?;

    let input = UpdateProject {
        project_name: payload.project_name.map(|s| s.trim().to_string()),
        client: payload.client.map(|s| s.trim().to_string()),
        phone: payload.phone,
        description: payload.description,
        status: payload.status,
        location: payload.location.map(Into::into),
        address: payload.address.map(|s| s.trim().to_string()),
    };

    let project = track("update", state.db.update_project(project_id, &input).await)?
        .ok_or_else(|| not_found(project_id))?;

    Ok(Json(project_response(project)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !track("delete", state.db.delete_project(project_id).await)? {
        return Err(not_found(project_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Replace materials, services and/or AC units. Absent collections are kept.
#[tracing::instrument(skip(state, payload))]
pub async fn save_line_items(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<LineItemsRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let input = ReplaceLineItems {
        materials: payload.materials,
        services: payload.services,
        ac_units: payload.ac_units,
    };

    let project = track(
        "save_line_items",
        state.db.replace_line_items(project_id, &input).await,
    )?
    .ok_or_else(|| not_found(project_id))?;

    Ok(Json(project_response(project)))
}

#[tracing::instrument(skip(state, unit))]
pub async fn add_ac_unit(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(unit): Json<LineItem>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    let result = state
        .db
        .modify_collections(project_id, "add_ac_unit", |project| {
            upsert_ac_unit(&mut project.ac_units.0, None, unit)
        })
        .await;
    let project = track("add_ac_unit", result)?;

    Ok((StatusCode::CREATED, Json(project_response(project))))
}

#[tracing::instrument(skip(state, unit))]
pub async fn update_ac_unit(
    State(state): State<AppState>,
    Path((project_id, index)): Path<(Uuid, usize)>,
    Json(unit): Json<LineItem>,
) -> Result<Json<ProjectResponse>, AppError> {
    let result = state
        .db
        .modify_collections(project_id, "update_ac_unit", |project| {
            upsert_ac_unit(&mut project.ac_units.0, Some(index), unit)
        })
        .await;
    let project = track("update_ac_unit", result)?;

    Ok(Json(project_response(project)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_ac_unit(
    State(state): State<AppState>,
    Path((project_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ProjectResponse>, AppError> {
    let result = state
        .db
        .modify_collections(project_id, "delete_ac_unit", |project| {
            remove_at(&mut project.ac_units.0, index, "AC unit").map(|_| ())
        })
        .await;
    let project = track("delete_ac_unit", result)?;

    Ok(Json(project_response(project)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_treats_all_and_blank_as_unfiltered() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(parse_status_filter(Some("  ")).unwrap(), None);
    }

    #[test]
    fn status_filter_parses_known_values() {
        assert_eq!(
            parse_status_filter(Some("pengerjaan")).unwrap(),
            Some(ProjectStatus::Pengerjaan)
        );
    }

    #[test]
    fn status_filter_rejects_unknown_values() {
        let err = parse_status_filter(Some("archived")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
