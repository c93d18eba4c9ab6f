//! Notification signal surfaced on the administrator's reports tab.
//!
//! A latch, not a subscription system: it arms when a high-priority report
//! enters the submitted state or when the background scan performs an
//! assignment, and clears when an administrator acknowledges it. It re-arms
//! on the next qualifying event.

use std::sync::atomic::{AtomicBool, Ordering};

use super::domain::{Priority, Report, Status};

#[derive(Debug, Default)]
pub struct NotificationSignal {
    armed: AtomicBool,
}

impl NotificationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm if the report is an unhandled high-priority submission.
    pub fn arm_if_qualifying(&self, report: &Report) {
        if report.status == Status::Submitted && report.priority == Priority::High {
            self.armed.store(true, Ordering::Release);
        }
    }

    /// Arm unconditionally; called when the background scan assigns.
    pub fn record_assignment(&self) {
        self.armed.store(true, Ordering::Release);
    }

    /// Clear the latch; called when the administrator views the surface.
    pub fn acknowledge(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{
        ward_for, Category, GeoPoint, LocationSource, ReportId,
    };
    use crate::reports::ledger::UpdateLedger;
    use chrono::Utc;

    fn report(category: Category, status: Status) -> Report {
        let location = GeoPoint {
            lat: 40.7614,
            lng: -73.9776,
        };
        Report {
            id: ReportId::generate(),
            title: "Unsafe intersection".to_string(),
            description: String::new(),
            category,
            status,
            priority: Priority::from_category(category),
            location,
            location_source: LocationSource::Device,
            ward: ward_for(&location),
            created_at: Utc::now(),
            user_id: "2".to_string(),
            assigned_to: None,
            estimated_completion: None,
            photo: None,
            voice_note: None,
            updates: UpdateLedger::new(),
        }
    }

    #[test]
    fn arms_only_for_submitted_high_priority() {
        let signal = NotificationSignal::new();

        signal.arm_if_qualifying(&report(Category::Sanitation, Status::Submitted));
        assert!(!signal.is_active());

        signal.arm_if_qualifying(&report(Category::Emergency, Status::Resolved));
        assert!(!signal.is_active());

        signal.arm_if_qualifying(&report(Category::Emergency, Status::Submitted));
        assert!(signal.is_active());
    }

    #[test]
    fn acknowledge_clears_until_next_event() {
        let signal = NotificationSignal::new();
        signal.record_assignment();
        assert!(signal.is_active());

        signal.acknowledge();
        assert!(!signal.is_active());

        signal.arm_if_qualifying(&report(Category::Emergency, Status::Submitted));
        assert!(signal.is_active());
    }
}
