mod summary;
pub mod views;

pub use summary::{
    average_resolution_hours, category_counts, closure_rate, department_load, filter_reports,
    latest_update, priority_counts, sla_entries, sla_target_hours, status_counts, summarize,
    visible_for, ReportFilter,
};
