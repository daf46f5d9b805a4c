//! Project service: HVAC installation projects, their line items and
//! attachments, and the quotation-versus-actual financial summary.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
