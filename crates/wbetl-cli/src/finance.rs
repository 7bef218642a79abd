//! The `finance` job: realization report lines per project, loaded into
//! `wb_finance`.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use wbetl_api::{flatten, WbClient};
use wbetl_core::{Project, ReportWindow};
use wbetl_warehouse::{LoadMode, RealizationRow};

use crate::runner::{run_projects, Collected};
use crate::{sink, JobContext};

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FinanceArgs {
    /// First day of the report period (YYYY-MM-DD); defaults to last week's Monday
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of the report period, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Delete rows already loaded for the period before inserting
    #[arg(long)]
    pub replace: bool,

    /// Fetch and transform, then print what would be written
    #[arg(long)]
    pub dry_run: bool,
}

impl FinanceArgs {
    /// The requested period; last Monday through Sunday when nothing is given.
    ///
    /// # Errors
    ///
    /// Returns an error if `--from` is after `--to`.
    pub fn window(&self, today: NaiveDate) -> anyhow::Result<ReportWindow> {
        let window = match (self.from, self.to) {
            (Some(from), Some(to)) => ReportWindow::new(from, to)?,
            _ => ReportWindow::previous_week(today)?,
        };
        Ok(window)
    }

    #[must_use]
    pub fn load_mode(&self, window: ReportWindow) -> LoadMode {
        if self.replace {
            LoadMode::ReplaceWindow(window)
        } else {
            LoadMode::Append
        }
    }
}

pub(crate) async fn collect_project(
    client: &WbClient,
    project: &Project,
    window: &ReportWindow,
    loaded_at: DateTime<Utc>,
) -> anyhow::Result<Collected<Vec<RealizationRow>>> {
    let report = client.realization_report(&project.api_key, window).await;
    if report.items.is_empty() && report.units_ok == 0 && report.is_partial() {
        anyhow::bail!("realization report returned nothing ({:?})", report.stop);
    }

    let rows: Vec<RealizationRow> = flatten::realization_records(&report.items)
        .iter()
        .map(|record| RealizationRow::from_record(&project.name, record, loaded_at))
        .collect();
    tracing::info!(
        project = %project.name,
        pages = report.units_ok,
        rows = rows.len(),
        "realization lines flattened"
    );

    Ok(Collected {
        value: rows,
        complete: !report.is_partial(),
    })
}

/// # Errors
///
/// Returns an error if the period is invalid, every project failed, the run
/// was cancelled, or the load failed.
pub(crate) async fn run(
    ctx: &JobContext,
    args: &FinanceArgs,
    today: NaiveDate,
    loaded_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    let window = args.window(today)?;
    let mode = args.load_mode(window);
    tracing::info!(%window, ?mode, "finance run started");

    let results = run_projects(
        &ctx.projects,
        ctx.config.max_concurrent_projects,
        "finance",
        |project| collect_project(&ctx.client, project, &window, loaded_at),
    )
    .await?;
    ctx.ensure_not_cancelled()?;

    let rows: Vec<RealizationRow> = results
        .collected
        .into_iter()
        .flat_map(|(_, rows)| rows)
        .collect();
    let summary = sink::write_table(&ctx.config, &rows, mode, args.dry_run).await?;

    println!(
        "finance {window}: {} rows into {} (partial projects: {}, failed projects: {})",
        summary.rows, summary.table, results.partial, results.failed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use wbetl_api::{Pacer, RetryPolicy};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn args() -> FinanceArgs {
        FinanceArgs {
            from: None,
            to: None,
            replace: false,
            dry_run: false,
        }
    }

    fn project() -> Project {
        Project {
            name: "WB-GutenTech".to_owned(),
            api_key: "k".to_owned(),
        }
    }

    fn test_client(server: &MockServer) -> WbClient {
        let uri = server.uri();
        WbClient::with_base_urls(5, "wbetl-test/0.1", RetryPolicy::default(), &uri, &uri)
            .unwrap()
            .with_statistics_base_url(&uri)
            .with_pacer(Pacer::recording())
    }

    #[test]
    fn default_period_is_last_week_appended() {
        let args = args();
        // 2024-12-11 is a Wednesday.
        let window = args.window(day(11)).unwrap();

        assert_eq!(window, ReportWindow::new(day(2), day(8)).unwrap());
        assert_eq!(args.load_mode(window), LoadMode::Append);
    }

    #[test]
    fn explicit_period_with_replace() {
        let args = FinanceArgs {
            from: Some(day(1)),
            to: Some(day(15)),
            replace: true,
            ..args()
        };
        let window = args.window(day(20)).unwrap();

        assert_eq!(window, ReportWindow::new(day(1), day(15)).unwrap());
        assert_eq!(args.load_mode(window), LoadMode::ReplaceWindow(window));
    }

    #[tokio::test]
    async fn report_lines_are_stamped_with_project_and_load_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v5/supplier/reportDetailByPeriod"))
            .and(query_param("dateFrom", "2024-12-02"))
            .and(query_param("dateTo", "2024-12-08"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"rrd_id": 1, "nm_id": 10, "doc_type_name": "Продажа",
                 "rr_dt": "2024-12-03T00:00:00Z", "is_legal_entity": true, "barcode": ""},
                {"rrd_id": 2, "nm_id": 11, "doc_type_name": "Возврат",
                 "rr_dt": "2024-12-04T00:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let loaded_at = Utc.with_ymd_and_hms(2024, 12, 11, 6, 0, 0).unwrap();
        let window = ReportWindow::new(day(2), day(8)).unwrap();

        let collected = collect_project(&client, &project(), &window, loaded_at)
            .await
            .unwrap();

        assert!(collected.complete);
        let rows = collected.value;
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|r| r.load_dt == loaded_at && r.project == "WB-GutenTech"));
        assert!(rows.iter().all(|r| r.source == "WB-Realization-API"));
        assert_eq!(rows[0].is_legal_entity, 1);
        assert_eq!(rows[0].barcode, None);
        assert_eq!(rows[1].doc_type_name.as_deref(), Some("Возврат"));
    }

    #[tokio::test]
    async fn rejected_key_fails_the_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v5/supplier/reportDetailByPeriod"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let window = ReportWindow::new(day(2), day(8)).unwrap();
        let result = collect_project(&client, &project(), &window, Utc::now()).await;

        assert!(result.is_err());
    }
}
