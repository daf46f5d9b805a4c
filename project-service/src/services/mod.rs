//! Services module for project-service.

pub mod collections;
pub mod dashboard;
pub mod database;
pub mod financials;
pub mod metrics;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_error, record_project_operation, record_summary};
