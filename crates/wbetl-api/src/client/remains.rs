//! Warehouse remains report: submit a task, wait, download.

use reqwest::Method;

use crate::error::ApiError;
use crate::types::{RemainsItem, RemainsTaskResponse};

use super::{WbClient, REMAINS_TASK_WAIT};

const REMAINS_QUERY: [(&str, &str); 4] = [
    ("locale", "ru"),
    ("groupByBrand", "true"),
    ("groupBySubject", "true"),
    ("groupBySa", "true"),
];

impl WbClient {
    /// Generates the stock report for the account and downloads it once ready.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the task cannot be created or downloaded, or
    /// [`ApiError::Cancelled`] if the run is cancelled during the wait.
    pub async fn warehouse_remains(&self, api_key: &str) -> Result<Vec<RemainsItem>, ApiError> {
        let url = self.analytics_url("/api/v1/warehouse_remains");
        let task: RemainsTaskResponse = self
            .request_json::<(), _>(
                api_key,
                Method::GET,
                &url,
                &REMAINS_QUERY,
                None,
                "warehouse_remains",
            )
            .await?;
        let task_id = task
            .data
            .map(|d| d.task_id)
            .ok_or_else(|| ApiError::Malformed {
                context: "warehouse_remains".to_owned(),
                reason: "response has no taskId".to_owned(),
            })?;

        tracing::debug!(
            task_id = %task_id,
            wait_secs = REMAINS_TASK_WAIT.as_secs(),
            "remains task created"
        );
        self.pacer.pause(REMAINS_TASK_WAIT, &self.cancel).await?;

        let download_url =
            self.analytics_url(&format!("/api/v1/warehouse_remains/tasks/{task_id}/download"));
        let items: Option<Vec<RemainsItem>> = self
            .request_json::<(), _>(
                api_key,
                Method::GET,
                &download_url,
                &[],
                None,
                "warehouse_remains/download",
            )
            .await?;
        Ok(items.unwrap_or_default())
    }
}
