//! Realization report of the statistics host.

use reqwest::Method;
use wbetl_core::ReportWindow;

use crate::paging::{fetch_keyed, FetchReport};
use crate::types::RealizationItem;

use super::{WbClient, REALIZATION_PAGE_LIMIT, REALIZATION_PAGE_PAUSE};

impl WbClient {
    /// Walks `reportDetailByPeriod` for `window` by `rrdid`, a minute between
    /// pages.
    pub async fn realization_report(
        &self,
        api_key: &str,
        window: &ReportWindow,
    ) -> FetchReport<RealizationItem> {
        let url = self.statistics_url("/api/v5/supplier/reportDetailByPeriod");
        let date_from = window.start().to_string();
        let date_to = window.end().to_string();
        let limit = REALIZATION_PAGE_LIMIT.to_string();

        fetch_keyed(
            REALIZATION_PAGE_LIMIT,
            REALIZATION_PAGE_PAUSE,
            &self.pacer,
            &self.cancel,
            "reportDetailByPeriod",
            |item: &RealizationItem| item.rrd_id,
            |rrdid| {
                let (url, date_from, date_to, limit) = (&url, &date_from, &date_to, &limit);
                async move {
                    let rrdid = rrdid.to_string();
                    let query = [
                        ("dateFrom", date_from.as_str()),
                        ("dateTo", date_to.as_str()),
                        ("limit", limit.as_str()),
                        ("rrdid", rrdid.as_str()),
                    ];
                    let items: Option<Vec<RealizationItem>> = self
                        .request_json::<(), _>(
                            api_key,
                            Method::GET,
                            url,
                            &query,
                            None,
                            "reportDetailByPeriod",
                        )
                        .await?;
                    Ok(items.unwrap_or_default())
                }
            },
        )
        .await
    }
}
