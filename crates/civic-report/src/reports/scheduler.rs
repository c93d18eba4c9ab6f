//! Cancelable background auto-assignment scan.
//!
//! Owned by the session lifecycle: the hosting service spawns it after the
//! store is ready and must call [`AutoAssignHandle::shutdown`] on teardown
//! so no mutation outlives the session. Each firing consults the gate and,
//! when it passes, promotes at most one submitted report.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::service::ReportService;
use super::store::ReportStore;

/// Decides whether a given firing of the timer actually runs the scan.
pub trait ScanGate: Send + Sync {
    fn should_fire(&self) -> bool;
}

/// Fires with fixed probability per tick, pacing the simulated backend
/// triage for demo sessions.
#[derive(Debug, Clone, Copy)]
pub struct RandomGate {
    pub probability: f64,
}

impl Default for RandomGate {
    fn default() -> Self {
        Self { probability: 0.3 }
    }
}

impl ScanGate for RandomGate {
    fn should_fire(&self) -> bool {
        rand::random::<f64>() < self.probability
    }
}

/// Fires every tick; used by tests and demos that need determinism.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFire;

impl ScanGate for AlwaysFire {
    fn should_fire(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct ScanConfig {
    pub interval: Duration,
    pub gate: Arc<dyn ScanGate>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            gate: Arc::new(RandomGate::default()),
        }
    }
}

/// Handle to the running scan task. Dropping it without calling
/// [`shutdown`](Self::shutdown) detaches the task; call shutdown on
/// logout/teardown.
pub struct AutoAssignHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AutoAssignHandle {
    /// Signal the loop to exit and wait for it to finish. No scan runs
    /// after this returns.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

pub fn spawn_auto_assign<S>(
    service: Arc<ReportService<S>>,
    config: ScanConfig,
) -> AutoAssignHandle
where
    S: ReportStore + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let ScanConfig { interval, gate } = config;

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !gate.should_fire() {
                        debug!("auto-assign scan gated off this tick");
                        continue;
                    }
                    match service.scan_once() {
                        Ok(Some(report)) => {
                            debug!(report = %report.id, "auto-assign scan promoted report");
                        }
                        Ok(None) => {}
                        Err(err) => warn!(%err, "auto-assign scan failed"),
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }
    });

    AutoAssignHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::assignment::CategoryDispatch;
    use crate::reports::domain::{Category, GeoPoint, NewReport, Role, Status, User};
    use crate::reports::lifecycle::TransitionPolicy;
    use crate::reports::store::{InMemoryReportStore, ReportStore};

    fn citizen() -> User {
        User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::Citizen,
        }
    }

    fn build_service() -> (Arc<ReportService<InMemoryReportStore>>, Arc<InMemoryReportStore>) {
        let store = Arc::new(InMemoryReportStore::new());
        let service = Arc::new(ReportService::new(
            store.clone(),
            TransitionPolicy::Strict,
            Arc::new(CategoryDispatch),
        ));
        (service, store)
    }

    fn submission(title: &str) -> NewReport {
        NewReport {
            title: title.to_string(),
            description: String::new(),
            category: Category::Sanitation,
            location: Some(GeoPoint {
                lat: 40.7505,
                lng: -73.9934,
            }),
            photo: None,
            voice_note: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scan_promotes_one_report_per_firing() {
        let (service, store) = build_service();
        service
            .submit(&citizen(), submission("Overflowing bin"))
            .expect("submit");
        service
            .submit(&citizen(), submission("Litter on sidewalk"))
            .expect("submit");

        let handle = spawn_auto_assign(
            service.clone(),
            ScanConfig {
                interval: Duration::from_secs(30),
                gate: Arc::new(AlwaysFire),
            },
        );

        tokio::time::sleep(Duration::from_secs(31)).await;
        handle.shutdown().await;

        let assigned = store
            .all()
            .expect("list")
            .into_iter()
            .filter(|report| report.status == Status::Assigned)
            .count();
        assert_eq!(assigned, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_further_mutation() {
        let (service, store) = build_service();
        service
            .submit(&citizen(), submission("Overflowing bin"))
            .expect("submit");

        let handle = spawn_auto_assign(
            service.clone(),
            ScanConfig {
                interval: Duration::from_secs(30),
                gate: Arc::new(AlwaysFire),
            },
        );
        handle.shutdown().await;

        tokio::time::sleep(Duration::from_secs(120)).await;
        let reports = store.all().expect("list");
        assert!(reports
            .iter()
            .all(|report| report.status == Status::Submitted));
    }
}
