use chrono::{Duration, Utc};
use civic_report::reports::{
    ward_for, Category, Department, GeoPoint, LocationSource, Priority, Report, ReportId, Role,
    Status, StoreError, UpdateEntry, UpdateKind, UpdateLedger, User,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn demo_citizen() -> User {
    User {
        id: "1".to_string(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        role: Role::Citizen,
    }
}

pub(crate) fn demo_admin() -> User {
    User {
        id: "9".to_string(),
        name: "City Administrator".to_string(),
        email: "admin@city.gov".to_string(),
        role: Role::Admin,
    }
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "infrastructure" => Ok(Category::Infrastructure),
        "sanitation" => Ok(Category::Sanitation),
        "safety" => Ok(Category::Safety),
        "environment" => Ok(Category::Environment),
        "traffic" => Ok(Category::Traffic),
        "emergency" => Ok(Category::Emergency),
        other => Err(format!("unknown category '{other}'")),
    }
}

fn seed_report(
    id: &str,
    title: &str,
    description: &str,
    category: Category,
    status: Status,
    location: GeoPoint,
    age: Duration,
    user_id: &str,
    assigned_to: Option<Department>,
    estimated_completion: Option<&str>,
    updates: UpdateLedger,
) -> Report {
    Report {
        id: ReportId(id.to_string()),
        title: title.to_string(),
        description: description.to_string(),
        category,
        status,
        priority: Priority::from_category(category),
        location,
        location_source: LocationSource::Device,
        ward: ward_for(&location),
        created_at: Utc::now() - age,
        user_id: user_id.to_string(),
        assigned_to,
        estimated_completion: estimated_completion.map(str::to_string),
        photo: None,
        voice_note: None,
        updates,
    }
}

fn team_update(id: &str, message: &str, author: &str, age: Duration) -> UpdateEntry {
    UpdateEntry {
        id: id.to_string(),
        message: message.to_string(),
        timestamp: Utc::now() - age,
        author: author.to_string(),
        kind: UpdateKind::StatusChange,
    }
}

/// Demo collection installed at startup so the dashboard has live data
/// before the first submission arrives.
pub(crate) fn seed_reports<S>(store: &S) -> Result<(), StoreError>
where
    S: civic_report::reports::ReportStore,
{
    let mut pothole_updates = UpdateLedger::new();
    pothole_updates.append(team_update(
        "seed-upd-1",
        "Crew dispatched to assess the damage. Materials ordered for repair.",
        "Public Works Team",
        Duration::days(1),
    ));

    let mut garbage_updates = UpdateLedger::new();
    garbage_updates.append(team_update(
        "seed-upd-2",
        "Bin emptied and additional pickup scheduled for high-traffic areas.",
        "Sanitation Team",
        Duration::days(1),
    ));

    let seeds = [
        seed_report(
            "seed-1",
            "Pothole on Main Street",
            "Large pothole near intersection causing damage to vehicles",
            Category::Infrastructure,
            Status::InProgress,
            GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            },
            Duration::days(2),
            "1",
            Some(Department::PublicWorks),
            Some("2-3 days"),
            pothole_updates,
        ),
        seed_report(
            "seed-2",
            "Broken Street Light",
            "Street light has been flickering for days and is now completely out",
            Category::Infrastructure,
            Status::Assigned,
            GeoPoint {
                lat: 40.7589,
                lng: -73.9851,
            },
            Duration::days(3),
            "1",
            Some(Department::PublicWorks),
            None,
            UpdateLedger::new(),
        ),
        seed_report(
            "seed-3",
            "Overflowing Garbage Bin",
            "Garbage bin at park entrance is overflowing, attracting pests",
            Category::Sanitation,
            Status::Resolved,
            GeoPoint {
                lat: 40.7505,
                lng: -73.9934,
            },
            Duration::days(5),
            "1",
            Some(Department::Sanitation),
            None,
            garbage_updates,
        ),
        seed_report(
            "seed-4",
            "Unsafe Intersection",
            "Traffic signal malfunction causing dangerous conditions",
            Category::Emergency,
            Status::Submitted,
            GeoPoint {
                lat: 40.7614,
                lng: -73.9776,
            },
            Duration::hours(1),
            "2",
            None,
            None,
            UpdateLedger::new(),
        ),
    ];

    for report in seeds {
        store.insert(report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_report::reports::{InMemoryReportStore, ReportStore};

    #[test]
    fn seeds_install_four_reports_with_derived_priorities() {
        let store = InMemoryReportStore::new();
        seed_reports(&store).expect("seeding succeeds");

        let reports = store.all().expect("list");
        assert_eq!(reports.len(), 4);

        for report in &reports {
            assert_eq!(report.priority, Priority::from_category(report.category));
        }

        let urgent = reports
            .iter()
            .find(|report| report.id.0 == "seed-4")
            .expect("seed-4 present");
        assert_eq!(urgent.status, Status::Submitted);
        assert_eq!(urgent.priority, Priority::High);
    }

    #[test]
    fn category_parser_accepts_the_fixed_taxonomy() {
        assert_eq!(parse_category("Emergency"), Ok(Category::Emergency));
        assert_eq!(parse_category("traffic"), Ok(Category::Traffic));
        assert!(parse_category("plumbing").is_err());
    }
}
