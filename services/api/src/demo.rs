use crate::infra::{demo_admin, demo_citizen, parse_category, seed_reports};
use civic_report::error::AppError;
use civic_report::reports::projection::views::DashboardSummary;
use civic_report::reports::{
    Category, CategoryDispatch, GeoPoint, InMemoryReportStore, NewReport, Report, ReportFilter,
    ReportService, Status, TransitionPolicy, WardId,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DashboardArgs {
    /// Restrict the summary to a single ward (1-10)
    #[arg(long)]
    pub(crate) ward: Option<u8>,
    /// Restrict the summary to a single category
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<Category>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the aggregate dashboard at the end of the demo
    #[arg(long)]
    pub(crate) skip_dashboard: bool,
}

fn build_service(seeded: bool) -> Result<Arc<ReportService<InMemoryReportStore>>, AppError> {
    let store = Arc::new(InMemoryReportStore::new());
    if seeded {
        seed_reports(store.as_ref()).map_err(civic_report::reports::ReportServiceError::from)?;
    }
    Ok(Arc::new(ReportService::new(
        store,
        TransitionPolicy::Strict,
        Arc::new(CategoryDispatch),
    )))
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let service = build_service(true)?;
    let filter = ReportFilter {
        ward: args.ward.map(WardId),
        category: args.category,
        status: None,
    };

    let summary = service.dashboard(&demo_admin(), &filter)?;
    render_dashboard(&summary);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let citizen = demo_citizen();
    let admin = demo_admin();
    let service = build_service(false)?;

    println!("Civic report workflow demo");

    let gas_leak = service.submit(
        &citizen,
        NewReport {
            title: "Gas leak".to_string(),
            description: "Strong smell of gas near the market entrance".to_string(),
            category: Category::Emergency,
            location: Some(GeoPoint {
                lat: 12.9,
                lng: 77.6,
            }),
            photo: None,
            voice_note: None,
        },
    )?;
    print_report("Submitted", &gas_leak);

    let pothole = service.submit(
        &citizen,
        NewReport {
            title: "Pothole on Main Street".to_string(),
            description: "Large pothole near intersection causing damage to vehicles".to_string(),
            category: Category::Infrastructure,
            location: Some(GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            }),
            photo: None,
            voice_note: None,
        },
    )?;
    print_report("Submitted", &pothole);

    println!(
        "\nNotification signal armed: {}",
        service.notifications_active()
    );

    // The background scan promotes the oldest submitted report.
    if let Some(promoted) = service.scan_once()? {
        print_report("Scan assigned", &promoted);
    }

    let assigned = service.quick_assign(&admin, &pothole.id)?;
    print_report("Quick assigned", &assigned);

    let in_progress = service.transition_status(&admin, &pothole.id, Status::InProgress)?;
    print_report("Updated", &in_progress);

    service.add_comment(&citizen, &pothole.id, "Any idea when the crew arrives?")?;
    let resolved = service.transition_status(&admin, &pothole.id, Status::Resolved)?;
    print_report("Updated", &resolved);

    println!("\nUpdate trail for {}", resolved.id);
    for entry in resolved.updates.entries() {
        println!(
            "- [{}] {} ({})",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.message,
            entry.author
        );
    }

    if !args.skip_dashboard {
        println!();
        let summary = service.dashboard(&admin, &ReportFilter::default())?;
        render_dashboard(&summary);
    }

    Ok(())
}

fn print_report(action: &str, report: &Report) {
    let department = report
        .assigned_to
        .map(|department| department.label())
        .unwrap_or("unassigned");
    println!(
        "{action}: {} \"{}\" [{} / {} / ward {}] status {} ({})",
        report.id,
        report.title,
        report.category.label(),
        report.priority.label(),
        report.ward,
        report.status.label(),
        department
    );
}

fn render_dashboard(summary: &DashboardSummary) {
    println!("Dashboard summary");
    println!(
        "Total reports: {} | closure rate: {}% | high priority: {}",
        summary.total, summary.closure_rate, summary.high_priority
    );
    if let Some(hours) = summary.average_resolution_hours {
        println!("Average resolution: {hours:.1}h");
    }

    println!("\nStatus breakdown");
    for entry in &summary.status_counts {
        println!("- {}: {}", entry.status_label, entry.count);
    }

    println!("\nPriority breakdown");
    for entry in &summary.priority_counts {
        println!("- {}: {}", entry.priority_label, entry.count);
    }

    println!("\nDepartment workload");
    for entry in &summary.department_load {
        println!("- {}: {} open", entry.department_label, entry.open);
    }

    println!("\nSLA posture");
    for entry in &summary.sla {
        match (entry.actual_hours, entry.compliance_pct) {
            (Some(actual), Some(pct)) => println!(
                "- {}: target {}h, actual {actual:.1}h ({pct}%)",
                entry.category_label, entry.target_hours
            ),
            _ => println!(
                "- {}: target {}h, no resolved reports yet",
                entry.category_label, entry.target_hours
            ),
        }
    }
}
