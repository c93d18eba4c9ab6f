//! Read-side projections over the report collection.
//!
//! Everything here is a pure function of the reports passed in, re-derivable
//! at any time; no aggregate is cached anywhere.

use super::super::assignment::Department;
use super::super::domain::{Category, Priority, Report, Role, Status, User, WardId};
use super::super::ledger::UpdateEntry;
use super::super::lifecycle::status_change_message;
use super::views::{
    CategoryCountEntry, DashboardSummary, DepartmentLoadEntry, PriorityCountEntry, SlaEntry,
    StatusCountEntry,
};

/// Optional exact-match filters; `None` means "all".
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub ward: Option<WardId>,
    pub category: Option<Category>,
    pub status: Option<Status>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.ward.map_or(true, |ward| report.ward == ward)
            && self
                .category
                .map_or(true, |category| report.category == category)
            && self.status.map_or(true, |status| report.status == status)
    }
}

pub fn filter_reports(reports: &[Report], filter: &ReportFilter) -> Vec<Report> {
    reports
        .iter()
        .filter(|report| filter.matches(report))
        .cloned()
        .collect()
}

/// Citizens see only their own reports; administrators see the full
/// collection.
pub fn visible_for(reports: &[Report], user: &User) -> Vec<Report> {
    match user.role {
        Role::Admin => reports.to_vec(),
        Role::Citizen => reports
            .iter()
            .filter(|report| report.user_id == user.id)
            .cloned()
            .collect(),
    }
}

/// Last ledger element, or none for a report with no updates yet.
pub fn latest_update(report: &Report) -> Option<&UpdateEntry> {
    report.updates.latest()
}

pub fn status_counts(reports: &[Report]) -> Vec<StatusCountEntry> {
    Status::ordered()
        .into_iter()
        .map(|status| StatusCountEntry {
            status,
            status_label: status.label(),
            count: reports.iter().filter(|r| r.status == status).count(),
        })
        .collect()
}

pub fn priority_counts(reports: &[Report]) -> Vec<PriorityCountEntry> {
    Priority::ordered()
        .into_iter()
        .map(|priority| PriorityCountEntry {
            priority,
            priority_label: priority.label(),
            count: reports.iter().filter(|r| r.priority == priority).count(),
        })
        .collect()
}

pub fn category_counts(reports: &[Report]) -> Vec<CategoryCountEntry> {
    Category::ordered()
        .into_iter()
        .map(|category| CategoryCountEntry {
            category,
            category_label: category.label(),
            count: reports.iter().filter(|r| r.category == category).count(),
        })
        .collect()
}

pub fn department_load(reports: &[Report]) -> Vec<DepartmentLoadEntry> {
    Department::ordered()
        .into_iter()
        .map(|department| DepartmentLoadEntry {
            department,
            department_label: department.label(),
            open: reports
                .iter()
                .filter(|r| r.assigned_to == Some(department) && r.status != Status::Resolved)
                .count(),
        })
        .collect()
}

/// Rounded percentage of resolved reports; 0 on an empty collection.
pub fn closure_rate(reports: &[Report]) -> u8 {
    if reports.is_empty() {
        return 0;
    }
    let resolved = reports
        .iter()
        .filter(|r| r.status == Status::Resolved)
        .count();
    ((resolved as f64 / reports.len() as f64) * 100.0).round() as u8
}

/// Hours from creation to the ledger entry that recorded resolution.
/// Reports resolved without a matching ledger entry (seeded data) are
/// skipped.
fn resolution_hours(report: &Report) -> Option<f64> {
    if report.status != Status::Resolved {
        return None;
    }
    let resolved_message = status_change_message(Status::Resolved);
    let resolved_at = report
        .updates
        .entries()
        .iter()
        .rev()
        .find(|entry| entry.message == resolved_message)
        .map(|entry| entry.timestamp)?;

    let span = resolved_at.signed_duration_since(report.created_at);
    Some(span.num_seconds() as f64 / 3600.0)
}

pub fn average_resolution_hours(reports: &[Report]) -> Option<f64> {
    let spans: Vec<f64> = reports.iter().filter_map(resolution_hours).collect();
    if spans.is_empty() {
        return None;
    }
    Some(spans.iter().sum::<f64>() / spans.len() as f64)
}

/// Illustrative SLA targets per category; not a contractual commitment.
pub const fn sla_target_hours(category: Category) -> f64 {
    match category {
        Category::Emergency => 2.0,
        Category::Safety => 24.0,
        Category::Traffic => 48.0,
        Category::Sanitation => 72.0,
        Category::Environment => 120.0,
        Category::Infrastructure => 168.0,
    }
}

pub fn sla_entries(reports: &[Report]) -> Vec<SlaEntry> {
    Category::ordered()
        .into_iter()
        .map(|category| {
            let target_hours = sla_target_hours(category);
            let spans: Vec<f64> = reports
                .iter()
                .filter(|r| r.category == category)
                .filter_map(resolution_hours)
                .collect();

            let actual_hours = if spans.is_empty() {
                None
            } else {
                Some(spans.iter().sum::<f64>() / spans.len() as f64)
            };

            let compliance_pct = actual_hours.map(|actual| {
                if actual <= 0.0 {
                    100u16
                } else {
                    ((target_hours / actual) * 100.0).round().min(999.0) as u16
                }
            });
            let on_track = compliance_pct.map(|pct| pct >= 90);

            SlaEntry {
                category,
                category_label: category.label(),
                target_hours,
                actual_hours,
                compliance_pct,
                on_track,
            }
        })
        .collect()
}

pub fn summarize(reports: &[Report]) -> DashboardSummary {
    DashboardSummary {
        total: reports.len(),
        closure_rate: closure_rate(reports),
        high_priority: reports
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count(),
        average_resolution_hours: average_resolution_hours(reports),
        status_counts: status_counts(reports),
        priority_counts: priority_counts(reports),
        category_counts: category_counts(reports),
        department_load: department_load(reports),
        sla: sla_entries(reports),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{ward_for, GeoPoint, LocationSource, ReportId};
    use crate::reports::ledger::{UpdateEntry, UpdateLedger};
    use chrono::{Duration, Utc};

    fn report(category: Category, status: Status, user_id: &str) -> Report {
        let location = GeoPoint {
            lat: 40.7505,
            lng: -73.9934,
        };
        Report {
            id: ReportId::generate(),
            title: "Overflowing garbage bin".to_string(),
            description: String::new(),
            category,
            status,
            priority: Priority::from_category(category),
            location,
            location_source: LocationSource::Device,
            ward: ward_for(&location),
            created_at: Utc::now() - Duration::hours(48),
            user_id: user_id.to_string(),
            assigned_to: None,
            estimated_completion: None,
            photo: None,
            voice_note: None,
            updates: UpdateLedger::new(),
        }
    }

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn closure_rate_rounds_and_handles_empty() {
        assert_eq!(closure_rate(&[]), 0);

        let reports = vec![
            report(Category::Sanitation, Status::Resolved, "1"),
            report(Category::Sanitation, Status::Submitted, "1"),
            report(Category::Sanitation, Status::Submitted, "1"),
        ];
        // 1 of 3 resolved -> 33.33 -> 33
        assert_eq!(closure_rate(&reports), 33);
    }

    #[test]
    fn visibility_is_exact_for_citizens_and_total_for_admins() {
        let reports = vec![
            report(Category::Safety, Status::Submitted, "1"),
            report(Category::Safety, Status::Submitted, "2"),
            report(Category::Safety, Status::Submitted, "1"),
        ];

        let citizen_view = visible_for(&reports, &user("1", Role::Citizen));
        assert_eq!(citizen_view.len(), 2);
        assert!(citizen_view.iter().all(|r| r.user_id == "1"));

        let admin_view = visible_for(&reports, &user("9", Role::Admin));
        assert_eq!(admin_view.len(), 3);
    }

    #[test]
    fn filters_combine_ward_category_and_status() {
        let mut in_ward = report(Category::Traffic, Status::Assigned, "1");
        in_ward.ward = WardId(4);
        let mut other_ward = report(Category::Traffic, Status::Assigned, "1");
        other_ward.ward = WardId(7);
        let other_category = report(Category::Sanitation, Status::Assigned, "1");

        let reports = vec![in_ward.clone(), other_ward, other_category];
        let filter = ReportFilter {
            ward: Some(WardId(4)),
            category: Some(Category::Traffic),
            status: None,
        };

        let matched = filter_reports(&reports, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, in_ward.id);
    }

    #[test]
    fn status_counts_are_zero_filled() {
        let counts = status_counts(&[]);
        assert_eq!(counts.len(), 4);
        assert!(counts.iter().all(|entry| entry.count == 0));
    }

    #[test]
    fn resolution_hours_come_from_the_ledger() {
        let mut resolved = report(Category::Emergency, Status::Resolved, "1");
        resolved
            .updates
            .append(UpdateEntry::status_change(status_change_message(
                Status::Resolved,
            )));

        let average = average_resolution_hours(&[resolved]).expect("span available");
        // Created 48h ago, resolved now.
        assert!((average - 48.0).abs() < 0.1);

        // A resolved report with no matching ledger entry contributes
        // nothing.
        let bare = report(Category::Emergency, Status::Resolved, "1");
        assert!(average_resolution_hours(&[bare]).is_none());
    }

    #[test]
    fn sla_entries_cover_every_category() {
        let entries = sla_entries(&[]);
        assert_eq!(entries.len(), Category::ordered().len());
        assert!(entries.iter().all(|entry| entry.actual_hours.is_none()));

        let emergency = entries
            .iter()
            .find(|entry| entry.category == Category::Emergency)
            .expect("emergency row");
        assert_eq!(emergency.target_hours, 2.0);
    }

    #[test]
    fn summary_reflects_department_load() {
        let mut assigned = report(Category::Sanitation, Status::Assigned, "1");
        assigned.assigned_to = Some(Department::Sanitation);
        let mut resolved = report(Category::Sanitation, Status::Resolved, "1");
        resolved.assigned_to = Some(Department::Sanitation);

        let summary = summarize(&[assigned, resolved]);
        let sanitation = summary
            .department_load
            .iter()
            .find(|entry| entry.department == Department::Sanitation)
            .expect("sanitation row");
        assert_eq!(sanitation.open, 1);
    }
}
