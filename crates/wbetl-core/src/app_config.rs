use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub projects_path: PathBuf,
    pub log_level: String,
    pub advert_api_url: String,
    pub analytics_api_url: String,
    pub statistics_api_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total attempts for a transiently failing request, first try included.
    pub max_retries: u32,
    pub retry_backoff_secs: u64,
    /// Wait applied to a 429 that carries no usable `Retry-After` header.
    pub rate_limit_default_secs: u64,
    pub max_rate_limit_waits: u32,
    pub max_concurrent_projects: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("clickhouse_url", &self.clickhouse_url)
            .field("clickhouse_database", &self.clickhouse_database)
            .field("clickhouse_user", &self.clickhouse_user)
            .field(
                "clickhouse_password",
                &self.clickhouse_password.as_ref().map(|_| "[redacted]"),
            )
            .field("projects_path", &self.projects_path)
            .field("log_level", &self.log_level)
            .field("advert_api_url", &self.advert_api_url)
            .field("analytics_api_url", &self.analytics_api_url)
            .field("statistics_api_url", &self.statistics_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_secs", &self.retry_backoff_secs)
            .field("rate_limit_default_secs", &self.rate_limit_default_secs)
            .field("max_rate_limit_waits", &self.max_rate_limit_waits)
            .field("max_concurrent_projects", &self.max_concurrent_projects)
            .finish()
    }
}
