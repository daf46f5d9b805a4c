//! Dashboard read side: statistics, filtering and map markers over a set of
//! loaded projects.

use crate::models::{Project, ProjectStatus};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    pub total_projects: usize,
    /// Projects in `prospek` or `pengerjaan`.
    pub active_projects: usize,
    /// Projects in `survey`.
    pub completed_projects: usize,
}

/// One pin on the projects map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub project_id: Uuid,
    pub project_name: String,
    pub client: String,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

pub fn dashboard_statistics(projects: &[Project]) -> DashboardStatistics {
    projects
        .iter()
        .fold(DashboardStatistics::default(), |mut stats, project| {
            let status = project.status();
            stats.total_projects += 1;
            if status.is_active() {
                stats.active_projects += 1;
            }
            if status == ProjectStatus::Survey {
                stats.completed_projects += 1;
            }
            stats
        })
}

/// Case-insensitive search over name, client and address.
///
/// An empty or whitespace-only query matches every project.
pub fn matches_query(project: &Project, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [&project.project_name, &project.client, &project.address]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Apply the status filter (`None` = all), then the text search.
pub fn filter_projects<'a>(
    projects: &'a [Project],
    status: Option<ProjectStatus>,
    query: Option<&str>,
) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| status.map_or(true, |s| p.status() == s))
        .filter(|p| query.map_or(true, |q| matches_query(p, q)))
        .collect()
}

pub fn map_markers<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Vec<MapMarker> {
    projects
        .into_iter()
        .map(|project| {
            let status = project.status();
            MapMarker {
                project_id: project.project_id,
                project_name: project.project_name.clone(),
                client: project.client.clone(),
                status,
                status_label: status.label(),
                lat: project.lat,
                lng: project.lng,
                address: project.address.clone(),
            }
        })
        .collect()
}
