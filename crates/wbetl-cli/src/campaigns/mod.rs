//! The `campaigns` job: advertising stats per SKU joined with campaign
//! metadata and order totals, loaded into `campaign_data_wb`.

pub mod aggregate;
pub mod merge;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use wbetl_api::{flatten, FetchReport, StatsPeriod, WbClient};
use wbetl_core::{ProductOrderFact, Project, ReportWindow};
use wbetl_warehouse::{CampaignDataRow, LoadMode};

use crate::runner::{run_projects, Collected};
use crate::{sink, JobContext};

pub use aggregate::{aggregate, Grouping};
pub use merge::merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Append,
    Replace,
}

/// Where order totals come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrdersSource {
    /// One nm-report detail walk per day.
    Detail,
    /// nm-report history over the whole window, in SKU batches.
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CampaignArgs {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long, requires = "to", conflicts_with = "days")]
    pub from: Option<NaiveDate>,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "from", conflicts_with = "days")]
    pub to: Option<NaiveDate>,

    /// Window of this many days ending yesterday
    #[arg(long)]
    pub days: Option<u32>,

    /// Load mode; single-day runs default to append, longer windows to replace
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Order totals source; defaults to detail for one day, history otherwise
    #[arg(long, value_enum)]
    pub orders: Option<OrdersSource>,

    /// Grouping applied to the stat lines before the join
    #[arg(long, value_enum, default_value_t = Grouping::DaySkuCampaign)]
    pub group_by: Grouping,

    /// Fetch and transform, then print what would be written
    #[arg(long)]
    pub dry_run: bool,
}

impl CampaignArgs {
    /// The requested window; yesterday when nothing is given.
    ///
    /// # Errors
    ///
    /// Returns an error if `--from` is after `--to` or `--days` is zero.
    pub fn window(&self, today: NaiveDate) -> anyhow::Result<ReportWindow> {
        let window = match (self.from, self.to, self.days) {
            (Some(from), Some(to), _) => ReportWindow::new(from, to)?,
            (_, _, Some(days)) => ReportWindow::trailing(days, today)?,
            _ => ReportWindow::trailing(1, today)?,
        };
        Ok(window)
    }

    #[must_use]
    pub fn load_mode(&self, window: ReportWindow) -> LoadMode {
        match self.mode {
            Some(ModeArg::Append) => LoadMode::Append,
            Some(ModeArg::Replace) => LoadMode::ReplaceWindow(window),
            None if window.is_single_day() => LoadMode::Append,
            None => LoadMode::ReplaceWindow(window),
        }
    }

    #[must_use]
    pub fn orders_source(&self, window: &ReportWindow) -> OrdersSource {
        self.orders.unwrap_or(if window.is_single_day() {
            OrdersSource::Detail
        } else {
            OrdersSource::History
        })
    }
}

fn log_report<T>(project: &str, stage: &'static str, report: &FetchReport<T>) {
    if report.is_partial() {
        tracing::warn!(
            project,
            stage,
            items = report.items.len(),
            units_ok = report.units_ok,
            units_failed = report.units_failed,
            stop = ?report.stop,
            "fetch incomplete"
        );
    } else {
        tracing::debug!(project, stage, items = report.items.len(), "fetch complete");
    }
}

async fn order_facts(
    client: &WbClient,
    project: &Project,
    window: &ReportWindow,
    source: OrdersSource,
    stats: &[wbetl_core::CampaignStatRow],
) -> (Vec<ProductOrderFact>, bool) {
    match source {
        OrdersSource::Detail => {
            let mut facts = Vec::new();
            let mut complete = true;
            for day in window.days() {
                let report = client
                    .nm_report_cards(&project.api_key, &ReportWindow::single(day))
                    .await;
                log_report(&project.name, "nm-report/detail", &report);
                complete &= !report.is_partial();
                facts.extend(
                    flatten::funnel_cards(&report.items)
                        .iter()
                        .map(wbetl_core::FunnelCard::order_fact),
                );
            }
            (facts, complete)
        }
        OrdersSource::History => {
            let nm_ids: Vec<i64> = stats
                .iter()
                .map(|s| s.nm_id)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if nm_ids.is_empty() {
                return (Vec::new(), true);
            }
            let report = client
                .nm_report_history(&project.api_key, &nm_ids, window)
                .await;
            log_report(&project.name, "nm-report/history", &report);
            (flatten::history_order_facts(&report.items), !report.is_partial())
        }
    }
}

/// Fetches and joins one project's rows for `window`.
///
/// # Errors
///
/// Returns an error if the campaign listing cannot be fetched. Later stages
/// degrade to partial data instead.
pub(crate) async fn collect_project(
    client: &WbClient,
    project: &Project,
    window: &ReportWindow,
    orders: OrdersSource,
    grouping: Grouping,
) -> anyhow::Result<Collected<Vec<CampaignDataRow>>> {
    let ids = client.campaign_ids(&project.api_key).await?;
    tracing::info!(project = %project.name, campaigns = ids.len(), "campaigns listed");
    if ids.is_empty() {
        return Ok(Collected {
            value: Vec::new(),
            complete: true,
        });
    }

    let details = client.campaign_details(&project.api_key, &ids).await;
    log_report(&project.name, "promotion/adverts", &details);
    let metadata = flatten::campaign_metadata(&details.items);

    let stats = client
        .campaign_stats(&project.api_key, &ids, &StatsPeriod::interval(window))
        .await;
    log_report(&project.name, "fullstats", &stats);
    let lines: Vec<_> = flatten::campaign_stat_rows(&stats.items)
        .into_iter()
        .filter(|row| window.contains(row.day))
        .collect();
    let aggregated = aggregate(&lines, grouping);

    let (facts, orders_complete) = order_facts(client, project, window, orders, &aggregated).await;

    let rows = merge(&project.name, &aggregated, &metadata, &facts);
    tracing::info!(
        project = %project.name,
        stat_lines = lines.len(),
        rows = rows.len(),
        order_facts = facts.len(),
        "campaign rows built"
    );

    Ok(Collected {
        value: rows,
        complete: !details.is_partial() && !stats.is_partial() && orders_complete,
    })
}

/// Runs the campaigns job for every project and loads the combined rows.
///
/// # Errors
///
/// Returns an error if the window is invalid, every project failed, the run
/// was cancelled, or the load failed.
pub(crate) async fn run(
    ctx: &JobContext,
    args: &CampaignArgs,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let window = args.window(today)?;
    let mode = args.load_mode(window);
    let orders = args.orders_source(&window);
    tracing::info!(%window, ?mode, ?orders, grouping = ?args.group_by, "campaigns run started");

    let results = run_projects(
        &ctx.projects,
        ctx.config.max_concurrent_projects,
        "campaigns",
        |project| collect_project(&ctx.client, project, &window, orders, args.group_by),
    )
    .await?;
    ctx.ensure_not_cancelled()?;

    let rows: Vec<CampaignDataRow> = results
        .collected
        .into_iter()
        .flat_map(|(_, rows)| rows)
        .collect();
    let summary = sink::write_table(&ctx.config, &rows, mode, args.dry_run).await?;

    println!(
        "campaigns {window}: {} rows into {} (partial projects: {}, failed projects: {})",
        summary.rows, summary.table, results.partial, results.failed
    );
    Ok(())
}

#[cfg(test)]
#[path = "campaigns_test.rs"]
mod tests;
