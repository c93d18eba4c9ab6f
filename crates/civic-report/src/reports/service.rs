use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::assignment::{Department, DispatchStrategy};
use super::domain::{
    ward_for, LocationSource, NewReport, Priority, Report, ReportId, Role, Status, User,
    DEFAULT_LOCATION,
};
use super::ledger::{UpdateEntry, UpdateLedger};
use super::lifecycle::{check_transition, status_change_message, LifecycleError, TransitionPolicy};
use super::notify::NotificationSignal;
use super::projection::{self, ReportFilter};
use super::projection::views::DashboardSummary;
use super::store::{ReportStore, StoreError};

/// Sole mutator of the report collection. Composes the store, the transition
/// policy, the dispatch strategy, and the notification latch; every write
/// path appends its ledger entry here so the trail cannot drift from the
/// state it describes.
pub struct ReportService<S> {
    store: Arc<S>,
    policy: TransitionPolicy,
    dispatch: Arc<dyn DispatchStrategy>,
    notifications: NotificationSignal,
}

impl<S> ReportService<S>
where
    S: ReportStore + 'static,
{
    pub fn new(store: Arc<S>, policy: TransitionPolicy, dispatch: Arc<dyn DispatchStrategy>) -> Self {
        let service = Self {
            store,
            policy,
            dispatch,
            notifications: NotificationSignal::new(),
        };

        // Arm the latch for anything already waiting in the store (seeded
        // collections start with live data).
        match service.store.all() {
            Ok(reports) => {
                for report in &reports {
                    service.notifications.arm_if_qualifying(report);
                }
            }
            Err(err) => warn!(%err, "could not scan store for pending notifications"),
        }

        service
    }

    /// Validate and record a new submission. Missing location falls back to
    /// the default coordinate with the source marked degraded.
    pub fn submit(&self, user: &User, new_report: NewReport) -> Result<Report, ReportServiceError> {
        if new_report.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle.into());
        }

        let (location, location_source) = match new_report.location {
            Some(point) => (point, LocationSource::Device),
            None => (DEFAULT_LOCATION, LocationSource::Fallback),
        };

        let report = Report {
            id: ReportId::generate(),
            title: new_report.title.trim().to_string(),
            description: new_report.description,
            category: new_report.category,
            status: Status::Submitted,
            priority: Priority::from_category(new_report.category),
            location,
            location_source,
            ward: ward_for(&location),
            created_at: Utc::now(),
            user_id: user.id.clone(),
            assigned_to: None,
            estimated_completion: None,
            photo: new_report.photo,
            voice_note: new_report.voice_note,
            updates: UpdateLedger::new(),
        };

        let stored = self.store.insert(report)?;
        self.notifications.arm_if_qualifying(&stored);

        info!(
            report = %stored.id,
            category = ?stored.category,
            priority = ?stored.priority,
            ward = %stored.ward,
            "report submitted"
        );
        Ok(stored)
    }

    pub fn get(&self, user: &User, id: &ReportId) -> Result<Report, ReportServiceError> {
        let report = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        if user.role == Role::Citizen && report.user_id != user.id {
            return Err(ReportServiceError::Forbidden(
                "citizens may only view their own reports",
            ));
        }
        Ok(report)
    }

    /// The caller's visible set with optional exact-match filters applied.
    pub fn visible_reports(
        &self,
        user: &User,
        filter: &ReportFilter,
    ) -> Result<Vec<Report>, ReportServiceError> {
        let reports = self.store.all()?;
        let visible = projection::visible_for(&reports, user);
        Ok(projection::filter_reports(&visible, filter))
    }

    /// Move a report to a new lifecycle state, recording the change on its
    /// ledger. Administrator-only.
    pub fn transition_status(
        &self,
        user: &User,
        id: &ReportId,
        to: Status,
    ) -> Result<Report, ReportServiceError> {
        self.require_admin(user, "only administrators may change report status")?;

        let mut report = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        check_transition(self.policy, report.status, to)?;

        report.status = to;
        report
            .updates
            .append(UpdateEntry::status_change(status_change_message(to)));
        self.store.update(report.clone())?;

        info!(report = %report.id, status = to.label(), "report status changed");
        Ok(report)
    }

    /// Append a comment to a report's ledger. Open to any authenticated
    /// caller; the supplied identity becomes the entry author.
    pub fn add_comment(
        &self,
        user: &User,
        id: &ReportId,
        message: &str,
    ) -> Result<Report, ReportServiceError> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }

        let mut report = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        report
            .updates
            .append(UpdateEntry::comment(message.trim(), user.name.clone()));
        self.store.update(report.clone())?;
        Ok(report)
    }

    /// Route a report to an explicit department. Administrator-only.
    pub fn assign(
        &self,
        user: &User,
        id: &ReportId,
        department: Department,
    ) -> Result<Report, ReportServiceError> {
        self.require_admin(user, "only administrators may assign reports")?;

        let mut report = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        // Moving a report between departments is not a status transition.
        if report.status != Status::Assigned {
            check_transition(self.policy, report.status, Status::Assigned)?;
        }

        report.status = Status::Assigned;
        report.assigned_to = Some(department);
        report
            .updates
            .append(UpdateEntry::system(format!("Assigned to {}", department.label())));
        self.store.update(report.clone())?;

        info!(report = %report.id, department = department.label(), "report assigned");
        Ok(report)
    }

    /// Assignment shortcut: department chosen by the configured strategy.
    pub fn quick_assign(&self, user: &User, id: &ReportId) -> Result<Report, ReportServiceError> {
        self.require_admin(user, "only administrators may assign reports")?;

        let report = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        let department = self.dispatch.select(&report);
        self.assign(user, id, department)
    }

    /// One pass of the background auto-assignment scan: promote the oldest
    /// submitted report, if any, and raise the notification latch. The
    /// timer and its fire-probability gate live with the scheduler; calling
    /// this directly is deterministic.
    pub fn scan_once(&self) -> Result<Option<Report>, ReportServiceError> {
        let reports = self.store.all()?;
        let candidate = reports
            .iter()
            .filter(|report| report.status == Status::Submitted)
            .min_by_key(|report| report.created_at);

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let mut report = candidate.clone();
        let department = self.dispatch.select(&report);
        report.status = Status::Assigned;
        report.assigned_to = Some(department);
        report
            .updates
            .append(UpdateEntry::system(format!("Assigned to {}", department.label())));
        self.store.update(report.clone())?;
        self.notifications.record_assignment();

        info!(
            report = %report.id,
            department = department.label(),
            "background scan assigned report"
        );
        Ok(Some(report))
    }

    /// Aggregate dashboard over the filtered collection. Administrator-only.
    pub fn dashboard(
        &self,
        user: &User,
        filter: &ReportFilter,
    ) -> Result<DashboardSummary, ReportServiceError> {
        self.require_admin(user, "only administrators may view the dashboard")?;
        let reports = self.store.all()?;
        let filtered = projection::filter_reports(&reports, filter);
        Ok(projection::summarize(&filtered))
    }

    pub fn notifications_active(&self) -> bool {
        self.notifications.is_active()
    }

    /// Clear the notification latch. Administrator-only; called when the
    /// reports surface is viewed.
    pub fn acknowledge_notifications(&self, user: &User) -> Result<(), ReportServiceError> {
        self.require_admin(user, "only administrators may acknowledge notifications")?;
        self.notifications.acknowledge();
        Ok(())
    }

    fn require_admin(
        &self,
        user: &User,
        reason: &'static str,
    ) -> Result<(), ReportServiceError> {
        if user.role == Role::Admin {
            Ok(())
        } else {
            Err(ReportServiceError::Forbidden(reason))
        }
    }
}

/// Input validation failures; user-visible and correctable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a report title is required")]
    MissingTitle,
    #[error("a comment message is required")]
    EmptyComment,
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("{0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
