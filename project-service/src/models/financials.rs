//! Derived financial views. Never persisted; recomputed from line items.

use super::LineItemKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quoted vs. actual cost of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinancials {
    pub total_quotation: Decimal,
    pub total_real: Decimal,
    /// `total_quotation - total_real`; positive means under quoted cost.
    pub profit_loss: Decimal,
    /// Break-even counts as profitable.
    pub is_profitable: bool,
}

impl Default for ProjectFinancials {
    fn default() -> Self {
        Self {
            total_quotation: Decimal::ZERO,
            total_real: Decimal::ZERO,
            profit_loss: Decimal::ZERO,
            is_profitable: true,
        }
    }
}

/// Materials-and-services comparison shown on the material tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummary {
    pub total_quotation: Decimal,
    pub total_real: Decimal,
    /// Percent over (positive) or under (negative) the quotation.
    pub total_deviation: Decimal,
    /// `total_real - total_quotation`.
    pub difference: Decimal,
}

/// Per-line comparison row, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub kind: LineItemKind,
    pub label: String,
    pub quotation_total: Decimal,
    pub real_total: Decimal,
    pub profit_loss: Decimal,
    pub deviation_percent: Decimal,
    pub is_profitable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcUnitCount {
    pub ac_type: String,
    pub quantity: Decimal,
}

/// Installed AC units, counted from quoted quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcUnitInventory {
    pub total_units: Decimal,
    pub by_type: Vec<AcUnitCount>,
}

/// Financials aggregated over a set of projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioFinancials {
    pub totals: ProjectFinancials,
    pub project_count: usize,
    pub profitable_projects: usize,
    pub loss_projects: usize,
    pub projects: Vec<ProjectFinancialsEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinancialsEntry {
    pub project_id: Uuid,
    pub project_name: String,
    pub financials: ProjectFinancials,
}
