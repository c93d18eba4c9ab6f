use crate::cli::ServeArgs;
use crate::infra::{seed_reports, AppState};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use civic_report::config::AppConfig;
use civic_report::error::AppError;
use civic_report::reports::{
    spawn_auto_assign, CategoryDispatch, InMemoryReportStore, RandomGate, ReportService,
    ScanConfig,
};
use civic_report::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryReportStore::new());
    if let Err(err) = seed_reports(store.as_ref()) {
        warn!(%err, "demo seed data could not be installed");
    }

    let service = Arc::new(ReportService::new(
        store,
        config.reports.transition_policy,
        Arc::new(CategoryDispatch),
    ));

    let scheduler = spawn_auto_assign(
        service.clone(),
        ScanConfig {
            interval: config.reports.scan_interval,
            gate: Arc::new(RandomGate::default()),
        },
    );

    let app = with_report_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "civic report service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // The scan task must not mutate a collection whose session is over.
    scheduler.shutdown().await;
    info!("auto-assign scan stopped, shutting down");

    Ok(())
}
