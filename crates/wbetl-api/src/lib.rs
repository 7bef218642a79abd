pub mod client;
pub mod error;
pub mod flatten;
pub mod pacer;
pub mod paging;
pub mod retry;
pub mod types;

pub use client::WbClient;
pub use error::ApiError;
pub use pacer::Pacer;
pub use paging::{FetchReport, StopReason};
pub use retry::RetryPolicy;
pub use types::StatsPeriod;

/// Builds the shared retry policy from application configuration.
#[must_use]
pub fn retry_policy_from_config(config: &wbetl_core::AppConfig) -> RetryPolicy {
    use std::time::Duration;

    RetryPolicy {
        max_attempts: config.max_retries.max(1),
        backoff: Duration::from_secs(config.retry_backoff_secs),
        default_rate_limit_wait: Duration::from_secs(config.rate_limit_default_secs),
        max_rate_limit_waits: config.max_rate_limit_waits,
    }
}
