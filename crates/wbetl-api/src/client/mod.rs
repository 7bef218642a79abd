//! HTTP client for the Wildberries seller APIs (advertising, analytics and
//! statistics hosts).

mod adverts;
mod analytics;
mod finance;
mod remains;

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::pacer::Pacer;
use crate::retry::RetryPolicy;

pub const DEFAULT_ADVERT_BASE_URL: &str = "https://advert-api.wildberries.ru";
pub const DEFAULT_ANALYTICS_BASE_URL: &str = "https://seller-analytics-api.wildberries.ru";
pub const DEFAULT_STATISTICS_BASE_URL: &str = "https://statistics-api.wildberries.ru";

/// Pause between `promotion/adverts` chunks.
pub const ADVERTS_CHUNK_PAUSE: Duration = Duration::from_secs(1);
/// Pause between `fullstats` chunks.
pub const FULLSTATS_CHUNK_PAUSE: Duration = Duration::from_secs(65);
/// Pause between nm-report detail pages.
pub const CURSOR_PAGE_PAUSE: Duration = Duration::from_secs(5);
/// Pause between nm-report history batches (three per minute).
pub const HISTORY_BATCH_PAUSE: Duration = Duration::from_secs(20);
/// Wait between submitting a warehouse-remains task and downloading it.
pub const REMAINS_TASK_WAIT: Duration = Duration::from_secs(30);
/// Pause between realization report pages (one request per minute).
pub const REALIZATION_PAGE_PAUSE: Duration = Duration::from_secs(60);
/// Rows per realization report page; the upstream maximum.
pub const REALIZATION_PAGE_LIMIT: usize = 100_000;

pub const ADVERTS_CHUNK_SIZE: usize = 50;
pub const FULLSTATS_CHUNK_SIZE: usize = 100;
pub const HISTORY_CHUNK_SIZE: usize = 20;

/// Client for the seller APIs.
///
/// One instance is shared by every project in a run; the API key is passed
/// per call. Use [`WbClient::new`] for production or
/// [`WbClient::with_base_urls`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct WbClient {
    client: Client,
    advert_base: String,
    analytics_base: String,
    statistics_base: String,
    policy: RetryPolicy,
    pacer: Pacer,
    cancel: CancellationToken,
}

impl WbClient {
    /// Creates a client pointed at the production hosts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str, policy: RetryPolicy) -> Result<Self, ApiError> {
        Self::with_base_urls(
            timeout_secs,
            user_agent,
            policy,
            DEFAULT_ADVERT_BASE_URL,
            DEFAULT_ANALYTICS_BASE_URL,
        )
    }

    /// Creates a client with custom hosts (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_urls(
        timeout_secs: u64,
        user_agent: &str,
        policy: RetryPolicy,
        advert_base: &str,
        analytics_base: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            advert_base: advert_base.trim_end_matches('/').to_owned(),
            analytics_base: analytics_base.trim_end_matches('/').to_owned(),
            statistics_base: DEFAULT_STATISTICS_BASE_URL.to_owned(),
            policy,
            pacer: Pacer::default(),
            cancel: CancellationToken::new(),
        })
    }

    /// Points the realization report at another statistics host.
    #[must_use]
    pub fn with_statistics_base_url(mut self, statistics_base: &str) -> Self {
        statistics_base
            .trim_end_matches('/')
            .clone_into(&mut self.statistics_base);
        self
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Makes the client stop between requests once `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    fn advert_url(&self, path: &str) -> String {
        format!("{}{path}", self.advert_base)
    }

    fn analytics_url(&self, path: &str) -> String {
        format!("{}{path}", self.analytics_base)
    }

    fn statistics_url(&self, path: &str) -> String {
        format!("{}{path}", self.statistics_base)
    }

    /// Sends one request under the retry policy and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RateLimited`]: HTTP 429 after the rate-limit budget is spent.
    /// - [`ApiError::ServerError`] / [`ApiError::Http`]: 5xx or transport failure after all
    ///   attempts.
    /// - [`ApiError::Permanent`]: any other non-2xx status (not retried).
    /// - [`ApiError::Deserialize`]: body is not the expected JSON (not retried).
    ///   An empty body reads as `null`.
    /// - [`ApiError::Cancelled`]: the run was cancelled.
    async fn request_json<B, T>(
        &self,
        api_key: &str,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        label: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let default_wait_secs = self.policy.default_rate_limit_wait.as_secs();

        self.policy
            .run(&self.pacer, &self.cancel, label, || {
                let method = method.clone();
                async move {
                    let mut request = self
                        .client
                        .request(method, url)
                        .header(reqwest::header::AUTHORIZATION, api_key)
                        .header(reqwest::header::ACCEPT, "application/json");
                    if !query.is_empty() {
                        request = request.query(query);
                    }
                    if let Some(body) = body {
                        request = request.json(body);
                    }

                    let response = request.send().await?;
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after_secs = response
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.trim().parse::<u64>().ok())
                            .unwrap_or(default_wait_secs);
                        return Err(ApiError::RateLimited {
                            endpoint: label.to_owned(),
                            retry_after_secs,
                        });
                    }

                    if status.is_server_error() {
                        return Err(ApiError::ServerError {
                            status: status.as_u16(),
                            endpoint: label.to_owned(),
                        });
                    }

                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(ApiError::Permanent {
                            status: status.as_u16(),
                            endpoint: label.to_owned(),
                            body,
                        });
                    }

                    let text = response.text().await?;
                    let text = if text.trim().is_empty() { "null" } else { text.as_str() };
                    serde_json::from_str::<T>(text).map_err(|e| ApiError::Deserialize {
                        context: label.to_owned(),
                        source: e,
                    })
                }
            })
            .await
    }
}
