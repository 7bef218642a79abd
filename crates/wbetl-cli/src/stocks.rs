//! The `stocks` job: a warehouse-remains snapshot per project, appended to
//! `warehouse_data_wb`.

use chrono::{DateTime, Utc};
use clap::Args;
use wbetl_api::{flatten, WbClient};
use wbetl_core::Project;
use wbetl_warehouse::{LoadMode, WarehouseStockRow};

use crate::runner::{run_projects, Collected};
use crate::{sink, JobContext};

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct StocksArgs {
    /// Fetch and transform, then print what would be written
    #[arg(long)]
    pub dry_run: bool,
}

pub(crate) async fn collect_project(
    client: &WbClient,
    project: &Project,
    taken_at: DateTime<Utc>,
) -> anyhow::Result<Collected<Vec<WarehouseStockRow>>> {
    let items = client.warehouse_remains(&project.api_key).await?;
    let rows: Vec<WarehouseStockRow> = flatten::warehouse_stocks(&items)
        .iter()
        .map(|stock| WarehouseStockRow::from_stock(&project.name, stock, taken_at))
        .collect();
    tracing::info!(
        project = %project.name,
        items = items.len(),
        rows = rows.len(),
        "remains flattened"
    );

    Ok(Collected {
        value: rows,
        complete: true,
    })
}

/// # Errors
///
/// Returns an error if every project failed, the run was cancelled, or the
/// load failed.
pub(crate) async fn run(
    ctx: &JobContext,
    args: &StocksArgs,
    taken_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    tracing::info!(%taken_at, "stocks run started");

    let results = run_projects(
        &ctx.projects,
        ctx.config.max_concurrent_projects,
        "stocks",
        |project| collect_project(&ctx.client, project, taken_at),
    )
    .await?;
    ctx.ensure_not_cancelled()?;

    let rows: Vec<WarehouseStockRow> = results
        .collected
        .into_iter()
        .flat_map(|(_, rows)| rows)
        .collect();
    let summary = sink::write_table(&ctx.config, &rows, LoadMode::Append, args.dry_run).await?;

    println!(
        "stocks {taken_at}: {} rows into {} (failed projects: {})",
        summary.rows, summary.table, results.failed
    );
    Ok(())
}
