//! Sales-funnel endpoints of the analytics host.

use reqwest::Method;
use wbetl_core::ReportWindow;

use crate::error::ApiError;
use crate::paging::{fetch_chunked, fetch_cursor, CursorPage, FetchReport};
use crate::types::{
    HistoryRequest, HistoryResponse, NmReportCard, NmReportRequest, NmReportResponse, OrderBy,
    PeriodBody, ProductHistory,
};

use super::{WbClient, CURSOR_PAGE_PAUSE, HISTORY_BATCH_PAUSE, HISTORY_CHUNK_SIZE};

/// Reporting timezone the seller cabinet uses.
const REPORT_TIMEZONE: &str = "Europe/Moscow";

impl WbClient {
    /// Walks `nm-report/detail` for `window`, highest order revenue first,
    /// five seconds between pages.
    pub async fn nm_report_cards(
        &self,
        api_key: &str,
        window: &ReportWindow,
    ) -> FetchReport<NmReportCard> {
        let url = self.analytics_url("/api/v2/nm-report/detail");

        fetch_cursor(
            CURSOR_PAGE_PAUSE,
            &self.pacer,
            &self.cancel,
            "nm-report/detail",
            |page| {
                let url = &url;
                async move {
                    let body = NmReportRequest {
                        period: PeriodBody {
                            begin: format!("{} 00:00:00", window.start()),
                            end: format!("{} 23:59:59", window.end()),
                        },
                        order_by: OrderBy {
                            field: "ordersSumRub",
                            mode: "desc",
                        },
                        page,
                        timezone: REPORT_TIMEZONE,
                        brand_names: &[],
                        object_ids: &[],
                        nm_ids: &[],
                    };
                    let response: NmReportResponse = self
                        .request_json(
                            api_key,
                            Method::POST,
                            url,
                            &[],
                            Some(&body),
                            "nm-report/detail",
                        )
                        .await?;
                    cursor_page(response)
                }
            },
        )
        .await
    }

    /// Fetches per-day funnel history in batches of 20 SKUs, twenty seconds apart.
    pub async fn nm_report_history(
        &self,
        api_key: &str,
        nm_ids: &[i64],
        window: &ReportWindow,
    ) -> FetchReport<ProductHistory> {
        let url = self.analytics_url("/api/v2/nm-report/detail/history");

        fetch_chunked(
            nm_ids,
            HISTORY_CHUNK_SIZE,
            HISTORY_BATCH_PAUSE,
            &self.pacer,
            &self.cancel,
            "nm-report/history",
            |chunk| {
                let url = &url;
                async move {
                    let body = HistoryRequest {
                        nm_ids: &chunk,
                        period: PeriodBody {
                            begin: window.start().to_string(),
                            end: window.end().to_string(),
                        },
                        timezone: REPORT_TIMEZONE,
                        aggregation_level: "day",
                    };
                    let response: HistoryResponse = self
                        .request_json(
                            api_key,
                            Method::POST,
                            url,
                            &[],
                            Some(&body),
                            "nm-report/history",
                        )
                        .await?;
                    if response.error {
                        return Err(ApiError::Malformed {
                            context: "nm-report/history".to_owned(),
                            reason: response.error_text.unwrap_or_default(),
                        });
                    }
                    Ok(response.data.unwrap_or_default())
                }
            },
        )
        .await
    }
}

fn cursor_page(response: NmReportResponse) -> Result<CursorPage<NmReportCard>, ApiError> {
    if response.error {
        return Err(ApiError::Malformed {
            context: "nm-report/detail".to_owned(),
            reason: response.error_text.unwrap_or_default(),
        });
    }
    let data = response.data.ok_or_else(|| ApiError::Malformed {
        context: "nm-report/detail".to_owned(),
        reason: "response has no data object".to_owned(),
    })?;
    Ok(CursorPage {
        items: data.cards.unwrap_or_default(),
        has_next: data.is_next_page,
    })
}
