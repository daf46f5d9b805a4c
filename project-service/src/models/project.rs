//! Project model for project-service.

use super::LineItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Sales/installation pipeline stage of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Prospek,
    Survey,
    Pengerjaan,
    Ditolak,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Prospek,
        ProjectStatus::Survey,
        ProjectStatus::Pengerjaan,
        ProjectStatus::Ditolak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Prospek => "prospek",
            ProjectStatus::Survey => "survey",
            ProjectStatus::Pengerjaan => "pengerjaan",
            ProjectStatus::Ditolak => "ditolak",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "survey" => ProjectStatus::Survey,
            "pengerjaan" => ProjectStatus::Pengerjaan,
            "ditolak" => ProjectStatus::Ditolak,
            _ => ProjectStatus::Prospek,
        }
    }

    /// Strict parse for query parameters; `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Prospek => "Prospek",
            ProjectStatus::Survey => "Survey",
            ProjectStatus::Pengerjaan => "Pengerjaan",
            ProjectStatus::Ditolak => "Ditolak",
        }
    }

    /// Counted as active on the dashboard.
    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::Prospek | ProjectStatus::Pengerjaan)
    }
}

/// Site location picked on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: String,
}

/// Metadata of an uploaded photo or document. The file itself lives in
/// external object storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub url: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Penawaran,
    Bast,
    Invoice,
    Gallery,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Penawaran => "penawaran",
            DocumentCategory::Bast => "bast",
            DocumentCategory::Invoice => "invoice",
            DocumentCategory::Gallery => "gallery",
        }
    }
}

/// Project documents grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocuments {
    #[serde(default)]
    pub penawaran: Vec<Attachment>,
    #[serde(default)]
    pub bast: Vec<Attachment>,
    #[serde(default)]
    pub invoice: Vec<Attachment>,
    #[serde(default)]
    pub gallery: Vec<Attachment>,
}

impl ProjectDocuments {
    pub fn category(&self, category: DocumentCategory) -> &Vec<Attachment> {
        match category {
            DocumentCategory::Penawaran => &self.penawaran,
            DocumentCategory::Bast => &self.bast,
            DocumentCategory::Invoice => &self.invoice,
            DocumentCategory::Gallery => &self.gallery,
        }
    }

    pub fn category_mut(&mut self, category: DocumentCategory) -> &mut Vec<Attachment> {
        match category {
            DocumentCategory::Penawaran => &mut self.penawaran,
            DocumentCategory::Bast => &mut self.bast,
            DocumentCategory::Invoice => &mut self.invoice,
            DocumentCategory::Gallery => &mut self.gallery,
        }
    }
}

/// Project record as stored in PostgreSQL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub project_id: Uuid,
    pub project_name: String,
    pub client: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub materials: Json<Vec<LineItem>>,
    pub services: Json<Vec<LineItem>>,
    pub ac_units: Json<Vec<LineItem>>,
    pub photos: Json<Vec<Attachment>>,
    pub documents: Json<ProjectDocuments>,
    pub created_by: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Project {
    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::from_string(&self.status)
    }

    pub fn location(&self) -> Location {
        Location {
            lat: self.lat,
            lng: self.lng,
            address: self.address.clone(),
        }
    }
}

/// Filter parameters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ListProjectsFilter {
    pub status: Option<ProjectStatus>,
    pub query: Option<String>,
}

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_name: String,
    pub client: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub location: Location,
    pub materials: Vec<LineItem>,
    pub services: Vec<LineItem>,
    pub created_by: String,
}

/// Input for updating project details. `None` leaves a field unchanged; an
/// empty `phone` or `description` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub project_name: Option<String>,
    pub client: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub location: Option<Location>,
    pub address: Option<String>,
}

/// Replacement line-item collections. `None` leaves a collection unchanged.
#[derive(Debug, Clone, Default)]
pub struct ReplaceLineItems {
    pub materials: Option<Vec<LineItem>>,
    pub services: Option<Vec<LineItem>>,
    pub ac_units: Option<Vec<LineItem>>,
}
