//! Civic report workflow: entity model, update ledger, lifecycle engine,
//! assignment selector, notification signal, and dashboard projections.

pub mod assignment;
pub mod domain;
pub mod ledger;
pub mod lifecycle;
pub mod notify;
pub mod projection;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod store;

pub use assignment::{CategoryDispatch, Department, DispatchStrategy, RandomDispatch};
pub use domain::{
    ward_for, Category, GeoPoint, LocationSource, NewReport, Priority, Report, ReportId, Role,
    Status, User, WardId, DEFAULT_LOCATION, WARD_COUNT,
};
pub use ledger::{UpdateEntry, UpdateKind, UpdateLedger, SYSTEM_AUTHOR};
pub use lifecycle::{
    allowed_targets, check_transition, status_change_message, LifecycleError, TransitionPolicy,
};
pub use notify::NotificationSignal;
pub use projection::ReportFilter;
pub use router::report_router;
pub use scheduler::{
    spawn_auto_assign, AlwaysFire, AutoAssignHandle, RandomGate, ScanConfig, ScanGate,
};
pub use service::{ReportService, ReportServiceError, ValidationError};
pub use store::{InMemoryReportStore, ReportStore, StoreError};
