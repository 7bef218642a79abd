//! The `funnel` job: one day of nm-report detail cards per project, appended
//! to `order_history_wb`.

use chrono::NaiveDate;
use clap::Args;
use wbetl_api::{flatten, WbClient};
use wbetl_core::{Project, ReportWindow};
use wbetl_warehouse::{LoadMode, OrderHistoryRow};

use crate::runner::{run_projects, Collected};
use crate::{sink, JobContext};

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FunnelArgs {
    /// Day to report on (YYYY-MM-DD); defaults to yesterday
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Fetch and transform, then print what would be written
    #[arg(long)]
    pub dry_run: bool,
}

pub(crate) async fn collect_project(
    client: &WbClient,
    project: &Project,
    day: NaiveDate,
) -> anyhow::Result<Collected<Vec<OrderHistoryRow>>> {
    let report = client
        .nm_report_cards(&project.api_key, &ReportWindow::single(day))
        .await;
    if report.items.is_empty() && report.units_ok == 0 && report.is_partial() {
        anyhow::bail!("nm-report detail returned nothing ({:?})", report.stop);
    }

    let rows: Vec<OrderHistoryRow> = flatten::funnel_cards(&report.items)
        .iter()
        .map(|card| OrderHistoryRow::from_card(&project.name, card))
        .collect();
    tracing::info!(
        project = %project.name,
        pages = report.units_ok,
        rows = rows.len(),
        "funnel cards flattened"
    );

    Ok(Collected {
        value: rows,
        complete: !report.is_partial(),
    })
}

/// # Errors
///
/// Returns an error if every project failed, the run was cancelled, or the
/// load failed.
pub(crate) async fn run(
    ctx: &JobContext,
    args: &FunnelArgs,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let day = match args.date {
        Some(day) => day,
        None => ReportWindow::trailing(1, today)?.start(),
    };
    tracing::info!(%day, "funnel run started");

    let results = run_projects(
        &ctx.projects,
        ctx.config.max_concurrent_projects,
        "funnel",
        |project| collect_project(&ctx.client, project, day),
    )
    .await?;
    ctx.ensure_not_cancelled()?;

    let rows: Vec<OrderHistoryRow> = results
        .collected
        .into_iter()
        .flat_map(|(_, rows)| rows)
        .collect();
    let summary = sink::write_table(&ctx.config, &rows, LoadMode::Append, args.dry_run).await?;

    println!(
        "funnel {day}: {} rows into {} (partial projects: {}, failed projects: {})",
        summary.rows, summary.table, results.partial, results.failed
    );
    Ok(())
}
