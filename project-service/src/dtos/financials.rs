use crate::models::{
    AcUnitInventory, LineBreakdown, LineItem, MaterialSummary, PortfolioFinancials,
    ProjectFinancials,
};
use crate::services::dashboard::{DashboardStatistics, MapMarker};
use serde::{Deserialize, Serialize};

/// Ad-hoc line items to summarise. Absent or `null` collections are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialsRequest {
    #[serde(default)]
    pub materials: Option<Vec<LineItem>>,
    #[serde(default)]
    pub services: Option<Vec<LineItem>>,
    #[serde(default)]
    pub ac_units: Option<Vec<LineItem>>,
}

impl FinancialsRequest {
    pub fn into_parts(self) -> (Vec<LineItem>, Vec<LineItem>, Vec<LineItem>) {
        (
            self.materials.unwrap_or_default(),
            self.services.unwrap_or_default(),
            self.ac_units.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    pub summary: ProjectFinancials,
    pub material_summary: MaterialSummary,
    pub items: Vec<LineBreakdown>,
    pub ac_units: AcUnitInventory,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub statistics: DashboardStatistics,
    pub portfolio: PortfolioFinancials,
    pub markers: Vec<MapMarker>,
}
