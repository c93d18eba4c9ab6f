//! The report collection and its access discipline.
//!
//! The store owns the only mutable copy of the collection. Every mutation
//! replaces the stored record wholesale under the lock, so readers holding
//! a previously fetched clone are unaffected. Single-process, in-memory by
//! design; the trait seam exists so tests and future backends can swap in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Report, ReportId};

/// Storage abstraction so the service and router can be exercised in
/// isolation.
pub trait ReportStore: Send + Sync {
    fn insert(&self, report: Report) -> Result<Report, StoreError>;
    fn update(&self, report: Report) -> Result<(), StoreError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, StoreError>;
    fn all(&self) -> Result<Vec<Report>, StoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
}

/// The shipped store: a mutex-guarded map living for the lifetime of one
/// running session.
#[derive(Default, Clone)]
pub struct InMemoryReportStore {
    records: Arc<Mutex<HashMap<ReportId, Report>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for InMemoryReportStore {
    fn insert(&self, report: Report) -> Result<Report, StoreError> {
        let mut guard = self.records.lock().expect("report store mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn update(&self, report: Report) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("report store mutex poisoned");
        if guard.contains_key(&report.id) {
            guard.insert(report.id.clone(), report);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, StoreError> {
        let guard = self.records.lock().expect("report store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Report>, StoreError> {
        let guard = self.records.lock().expect("report store mutex poisoned");
        let mut reports: Vec<Report> = guard.values().cloned().collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{
        ward_for, Category, GeoPoint, LocationSource, Priority, Status,
    };
    use crate::reports::ledger::UpdateLedger;
    use chrono::{Duration, Utc};

    fn sample_report(minutes_ago: i64) -> Report {
        let location = GeoPoint {
            lat: 40.7589,
            lng: -73.9851,
        };
        Report {
            id: ReportId::generate(),
            title: "Broken street light".to_string(),
            description: String::new(),
            category: Category::Infrastructure,
            status: Status::Submitted,
            priority: Priority::from_category(Category::Infrastructure),
            location,
            location_source: LocationSource::Device,
            ward: ward_for(&location),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            user_id: "1".to_string(),
            assigned_to: None,
            estimated_completion: None,
            photo: None,
            voice_note: None,
            updates: UpdateLedger::new(),
        }
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = InMemoryReportStore::new();
        let report = sample_report(0);
        store.insert(report.clone()).expect("first insert");
        assert_eq!(store.insert(report), Err(StoreError::Conflict));
    }

    #[test]
    fn update_requires_existing_record() {
        let store = InMemoryReportStore::new();
        assert_eq!(store.update(sample_report(0)), Err(StoreError::NotFound));
    }

    #[test]
    fn all_returns_newest_first() {
        let store = InMemoryReportStore::new();
        let older = store.insert(sample_report(90)).expect("insert older");
        let newer = store.insert(sample_report(5)).expect("insert newer");

        let listed = store.all().expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[test]
    fn fetched_clone_is_unaffected_by_later_updates() {
        let store = InMemoryReportStore::new();
        let report = store.insert(sample_report(0)).expect("insert");
        let snapshot = store
            .fetch(&report.id)
            .expect("fetch")
            .expect("record present");

        let mut changed = snapshot.clone();
        changed.status = Status::Assigned;
        store.update(changed).expect("update");

        assert_eq!(snapshot.status, Status::Submitted);
    }
}
