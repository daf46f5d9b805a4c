//! In-memory edits applied to a project's collections before they are written
//! back wholesale.

use crate::models::{Attachment, LineItem};
use service_core::error::AppError;

/// Append an AC unit, or replace the one at `index`.
pub fn upsert_ac_unit(
    ac_units: &mut Vec<LineItem>,
    index: Option<usize>,
    unit: LineItem,
) -> Result<(), AppError> {
    if unit.label().trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("AC type is required")));
    }
    match index {
        None => ac_units.push(unit),
        Some(i) => {
            let slot = ac_units
                .get_mut(i)
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("AC unit {} not found", i)))?;
            *slot = unit;
        }
    }
    Ok(())
}

/// Remove and return the element at `index`.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize, what: &str) -> Result<T, AppError> {
    if index >= items.len() {
        return Err(AppError::NotFound(anyhow::anyhow!("{} {} not found", what, index)));
    }
    Ok(items.remove(index))
}

/// Append photos unless the project would exceed `max_photos`.
pub fn add_photos(
    photos: &mut Vec<Attachment>,
    new_photos: Vec<Attachment>,
    max_photos: usize,
) -> Result<(), AppError> {
    if photos.len() + new_photos.len() > max_photos {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "A project can have at most {} photos ({} already uploaded)",
            max_photos,
            photos.len()
        )));
    }
    photos.extend(new_photos);
    Ok(())
}
