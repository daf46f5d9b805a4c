//! Request and response bodies for the HTTP API.

mod financials;
mod project;

pub use financials::{BreakdownResponse, DashboardResponse, FinancialsRequest};
pub use project::{
    AddPhotosRequest, AttachmentRequest, CreateProjectRequest, LineItemsRequest,
    ListProjectsQuery, LocationInput, ProjectListResponse, ProjectResponse, UpdateProjectRequest,
};

use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
