//! Domain models for project-service.

mod financials;
mod line_item;
mod project;

pub use financials::{
    AcUnitCount, AcUnitInventory, LineBreakdown, MaterialSummary, PortfolioFinancials,
    ProjectFinancials, ProjectFinancialsEntry,
};
pub use line_item::{coerce_decimal, LineItem, LineItemKind};
pub use project::{
    Attachment, CreateProject, DocumentCategory, ListProjectsFilter, Location, Project,
    ProjectDocuments, ProjectStatus, ReplaceLineItems, UpdateProject,
};
