use serde::Serialize;

use super::super::assignment::Department;
use super::super::domain::{Category, Priority, Status};

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: Status,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityCountEntry {
    pub priority: Priority,
    pub priority_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCountEntry {
    pub category: Category,
    pub category_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentLoadEntry {
    pub department: Department,
    pub department_label: &'static str,
    /// Reports assigned to the department and not yet resolved.
    pub open: usize,
}

/// SLA posture per category: illustrative targets against actual mean
/// resolution of resolved reports in that category.
#[derive(Debug, Clone, Serialize)]
pub struct SlaEntry {
    pub category: Category,
    pub category_label: &'static str,
    pub target_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_pct: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_track: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    /// Rounded percentage of resolved reports; 0 when the collection is
    /// empty.
    pub closure_rate: u8,
    pub high_priority: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_resolution_hours: Option<f64>,
    pub status_counts: Vec<StatusCountEntry>,
    pub priority_counts: Vec<PriorityCountEntry>,
    pub category_counts: Vec<CategoryCountEntry>,
    pub department_load: Vec<DepartmentLoadEntry>,
    pub sla: Vec<SlaEntry>,
}
