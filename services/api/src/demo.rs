use chrono::{Local, NaiveDate};
use clap::Args;
use da_tracker::config::AppConfig;
use da_tracker::error::AppError;
use da_tracker::lifecycle::{
    ComplianceCsvImporter, DocumentChecklist, LifecyclePolicy, ProjectDashboard, ProjectStore,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date for overdue RFIs (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Compliance table export (CSV) for a fresh application instead of the
    /// bundled sample project.
    #[arg(long)]
    pub(crate) compliance_csv: Option<PathBuf>,
    /// Site address used with --compliance-csv.
    #[arg(long, default_value = "12 Example Avenue")]
    pub(crate) address: String,
    /// Project name used with --compliance-csv.
    #[arg(long, default_value = "Dual occupancy")]
    pub(crate) name: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let imported = args.compliance_csv.is_some();

    let store = prepare_store(config.lifecycle, &args)?;
    let project = store.active()?;
    let dashboard = ProjectDashboard::build(project, store.policy(), today);

    render_dashboard(&dashboard, imported);
    Ok(())
}

pub(crate) fn prepare_store(
    policy: LifecyclePolicy,
    args: &DemoArgs,
) -> Result<ProjectStore, AppError> {
    let mut store = ProjectStore::new(policy);

    match &args.compliance_csv {
        Some(path) => {
            let items = ComplianceCsvImporter::read_path(path)?;
            store.create_project_with_checklist(
                &args.address,
                &args.name,
                &DocumentChecklist::standard(),
            );
            store.record_compliance_items(items)?;
        }
        None => {
            store.load_demo_project();
        }
    }

    Ok(store)
}

pub(crate) fn render_dashboard(dashboard: &ProjectDashboard, imported: bool) {
    println!("Development application dashboard");
    println!(
        "{} | {} ({}), evaluated {}",
        dashboard.project_id, dashboard.name, dashboard.address, dashboard.today
    );

    if imported {
        println!("Data source: compliance CSV import");
    } else {
        println!("Data source: bundled sample project");
    }

    println!("\nStage progress");
    for stage in &dashboard.stages {
        match stage.entered_on {
            Some(on) => println!("- {}: {:?} (entered {})", stage.stage_label, stage.state, on),
            None => println!("- {}: {:?}", stage.stage_label, stage.state),
        }
    }

    println!(
        "\nCompliance score: {}% | Completion: {}%",
        dashboard.compliance_score, dashboard.completion_percent
    );
    println!(
        "Documents: {} uploaded, {} required",
        dashboard.documents_uploaded, dashboard.documents_required
    );
    println!(
        "Timeline: day {} of {} ({})",
        dashboard.days_elapsed, dashboard.target_days, dashboard.timeline_risk_label
    );

    if dashboard.outstanding_rfis.is_empty() {
        println!("\nOutstanding RFIs: none");
    } else {
        println!("\nOutstanding RFIs ({} overdue)", dashboard.overdue_rfis);
        for rfi in &dashboard.outstanding_rfis {
            let flag = if rfi.overdue { " OVERDUE" } else { "" };
            println!(
                "- {} {}: {} (officer {}, due {}){}",
                rfi.id, rfi.status_label, rfi.requirement, rfi.officer, rfi.deadline, flag
            );
        }
    }

    if !dashboard.condition_progress.is_empty() {
        println!("\nConsent conditions");
        for entry in &dashboard.condition_progress {
            println!(
                "- {}: {}/{} done ({}%)",
                entry.category, entry.completed, entry.total, entry.percent
            );
        }
    }

    if dashboard.compliance_gaps.is_empty() {
        println!("\nCompliance gaps: none");
    } else {
        println!("\nCompliance gaps");
        for gap in &dashboard.compliance_gaps {
            println!(
                "- [{}] {} {}: proposed {} against {}",
                gap.status_label, gap.category, gap.control, gap.proposal, gap.requirement
            );
        }
    }

    match &dashboard.next_gate_blocker {
        Some(blocker) => println!("\nNext gate blocked: {}", blocker),
        None => println!("\nNext gate: clear"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use da_tracker::lifecycle::DaStage;

    #[test]
    fn demo_without_csv_loads_sample_project() {
        let store = prepare_store(LifecyclePolicy::default(), &DemoArgs::default())
            .expect("sample project loads");
        let project = store.active().expect("active project");

        assert_eq!(project.current_stage(), DaStage::PostConsent);
        assert_eq!(project.compliance_score(), 95);
    }

    #[test]
    fn missing_csv_is_an_io_error() {
        let args = DemoArgs {
            compliance_csv: Some(PathBuf::from("does/not/exist.csv")),
            ..DemoArgs::default()
        };

        let err = prepare_store(LifecyclePolicy::default(), &args).expect_err("file missing");
        assert!(matches!(err, AppError::Import(_)));
    }

    #[test]
    fn dashboard_renders_for_fresh_project() {
        let mut store = ProjectStore::default();
        store.create_project_with_checklist(
            "12 Example Avenue",
            "Dual occupancy",
            &DocumentChecklist::standard(),
        );
        let project = store.active().expect("active project");
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date");
        let dashboard = ProjectDashboard::build(project, store.policy(), today);

        assert!(dashboard.next_gate_blocker.is_some());
        assert_eq!(dashboard.documents_required, 9);
        render_dashboard(&dashboard, false);
    }
}
