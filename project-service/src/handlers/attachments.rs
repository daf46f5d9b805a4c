//! Photo and document attachment endpoints.
//!
//! Files are uploaded to object storage by the client; these endpoints only
//! record the resulting download URLs.

use super::project_response;
use crate::dtos::{AddPhotosRequest, AttachmentRequest, ProjectResponse};
use crate::models::DocumentCategory;
use crate::services::collections::{add_photos, remove_at};
use crate::services::{record_error, record_project_operation};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

fn finish(
    operation: &str,
    result: Result<crate::models::Project, AppError>,
) -> Result<Json<ProjectResponse>, AppError> {
    match result {
        Ok(project) => {
            record_project_operation(operation, "success");
            Ok(Json(project_response(project)))
        }
        Err(e) => {
            record_project_operation(operation, "error");
            record_error(e.kind());
            Err(e)
        }
    }
}

#[tracing::instrument(skip(state, payload), fields(count = payload.photos.len()))]
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<AddPhotosRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    payload.validate_all()?;

    let uploaded_at = Utc::now();
    let new_photos = payload
        .photos
        .into_iter()
        .map(|photo| photo.into_attachment(uploaded_at))
        .collect();
    let max_photos = state.config.uploads.max_photos_per_project;

    let result = state
        .db
        .modify_collections(project_id, "upload_photos", |project| {
            add_photos(&mut project.photos.0, new_photos, max_photos)
        })
        .await;

    finish("upload_photos", result).map(|body| (StatusCode::CREATED, body))
}

#[tracing::instrument(skip(state))]
pub async fn delete_photo(
    State(state): State<AppState>,
    Path((project_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ProjectResponse>, AppError> {
    let result = state
        .db
        .modify_collections(project_id, "delete_photo", |project| {
            remove_at(&mut project.photos.0, index, "Photo").map(|_| ())
        })
        .await;

    finish("delete_photo", result)
}

#[tracing::instrument(skip(state, payload), fields(category = category.as_str()))]
pub async fn upload_document(
    State(state): State<AppState>,
    Path((project_id, category)): Path<(Uuid, DocumentCategory)>,
    Json(payload): Json<AttachmentRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    payload.validate()?;

    let document = payload.into_attachment(Utc::now());
    let result = state
        .db
        .modify_collections(project_id, "upload_document", |project| {
            project.documents.0.category_mut(category).push(document);
            Ok(())
        })
        .await;

    finish("upload_document", result).map(|body| (StatusCode::CREATED, body))
}

#[tracing::instrument(skip(state), fields(category = category.as_str()))]
pub async fn delete_document(
    State(state): State<AppState>,
    Path((project_id, category, index)): Path<(Uuid, DocumentCategory, usize)>,
) -> Result<Json<ProjectResponse>, AppError> {
    let result = state
        .db
        .modify_collections(project_id, "delete_document", |project| {
            remove_at(project.documents.0.category_mut(category), index, "Document").map(|_| ())
        })
        .await;

    finish("delete_document", result)
}
