//! Core library for the civic issue reporting service.
//!
//! Citizens submit reports (category, location, attachments) which move
//! through a fixed lifecycle (submitted -> assigned -> in progress ->
//! resolved). Administrators triage, assign departments, and monitor
//! aggregate dashboards. All state is held in an in-memory store owned by
//! the hosting service; mutations flow through [`reports::ReportService`].

pub mod config;
pub mod error;
pub mod reports;
pub mod telemetry;
