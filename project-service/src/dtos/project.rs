use super::non_blank;
use crate::models::{
    Attachment, LineItem, Location, Project, ProjectDocuments, ProjectFinancials, ProjectStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: String,
}

impl Validate for LocationInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !(-90.0..=90.0).contains(&self.lat) {
            errors.add("lat", coordinate_error("Latitude must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            errors.add("lng", coordinate_error("Longitude must be between -180 and 180"));
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn coordinate_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

impl From<LocationInput> for Location {
    fn from(input: LocationInput) -> Self {
        Location {
            lat: input.lat,
            lng: input.lng,
            address: input.address.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(custom(function = "non_blank"))]
    pub project_name: String,
    #[validate(custom(function = "non_blank"))]
    pub client: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub location: LocationInput,
    pub materials: Option<Vec<LineItem>>,
    pub services: Option<Vec<LineItem>>,
    pub created_by: Option<String>,
}

impl CreateProjectRequest {
    /// Validate the request including its location.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.location.validate()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(custom(function = "non_blank"))]
    pub project_name: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub client: Option<String>,
    /// Empty clears the stored phone.
    pub phone: Option<String>,
    /// Empty clears the stored description.
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub location: Option<LocationInput>,
    /// Address text only, keeping the current coordinates.
    pub address: Option<String>,
}

impl UpdateProjectRequest {
    /// Validate the request including a new location, if any.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        match &self.location {
            Some(location) => location.validate(),
            None => Ok(()),
        }
    }
}

/// Wholesale replacement of line-item collections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemsRequest {
    pub materials: Option<Vec<LineItem>>,
    pub services: Option<Vec<LineItem>>,
    pub ac_units: Option<Vec<LineItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AttachmentRequest {
    #[validate(url(message = "A valid download URL is required"))]
    pub url: String,
    #[validate(custom(function = "non_blank"))]
    pub filename: String,
}

impl AttachmentRequest {
    pub fn into_attachment(self, uploaded_at: DateTime<Utc>) -> Attachment {
        Attachment {
            url: self.url,
            filename: self.filename.trim().to_string(),
            uploaded_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPhotosRequest {
    #[validate(length(min = 1, message = "At least one photo is required"))]
    pub photos: Vec<AttachmentRequest>,
}

impl AddPhotosRequest {
    /// Validate the batch and every photo in it.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.photos.iter().try_for_each(|photo| photo.validate())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    /// Status value, or `all`.
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub project_id: Uuid,
    pub project_name: String,
    pub client: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    pub location: Location,
    pub materials: Vec<LineItem>,
    pub services: Vec<LineItem>,
    pub ac_units: Vec<LineItem>,
    pub photos: Vec<Attachment>,
    pub documents: ProjectDocuments,
    pub financials: ProjectFinancials,
    pub created_by: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl ProjectResponse {
    pub fn new(project: Project, financials: ProjectFinancials) -> Self {
        let status = project.status();
        let location = project.location();
        Self {
            project_id: project.project_id,
            project_name: project.project_name,
            client: project.client,
            phone: project.phone,
            description: project.description,
            status,
            status_label: status.label(),
            location,
            materials: project.materials.0,
            services: project.services.0,
            ac_units: project.ac_units.0,
            photos: project.photos.0,
            documents: project.documents.0,
            financials,
            created_by: project.created_by,
            created_utc: project.created_utc,
            updated_utc: project.updated_utc,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
    pub count: usize,
}
