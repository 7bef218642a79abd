use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_ADVERT_API_URL: &str = "https://advert-api.wildberries.ru";
pub const DEFAULT_ANALYTICS_API_URL: &str = "https://seller-analytics-api.wildberries.ru";
pub const DEFAULT_STATISTICS_API_URL: &str = "https://statistics-api.wildberries.ru";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_string())
        } else {
            Err(invalid(var, format!("expected an http(s) URL, got \"{raw}\"")))
        }
    };

    let clickhouse_url = require("WBETL_CLICKHOUSE_URL")?;
    if !(clickhouse_url.starts_with("http://") || clickhouse_url.starts_with("https://")) {
        return Err(invalid(
            "WBETL_CLICKHOUSE_URL",
            "expected an http(s) URL of the ClickHouse HTTP interface".to_string(),
        ));
    }
    let clickhouse_database = or_default("WBETL_CLICKHOUSE_DATABASE", "default");
    let clickhouse_user = lookup("WBETL_CLICKHOUSE_USER").ok();
    let clickhouse_password = lookup("WBETL_CLICKHOUSE_PASSWORD").ok();

    let projects_path = PathBuf::from(or_default(
        "WBETL_PROJECTS_PATH",
        "./config/projects.yaml",
    ));
    let log_level = or_default("WBETL_LOG_LEVEL", "info");

    let advert_api_url = parse_url("WBETL_ADVERT_API_URL", DEFAULT_ADVERT_API_URL)?;
    let analytics_api_url = parse_url("WBETL_ANALYTICS_API_URL", DEFAULT_ANALYTICS_API_URL)?;
    let statistics_api_url = parse_url("WBETL_STATISTICS_API_URL", DEFAULT_STATISTICS_API_URL)?;

    let request_timeout_secs = parse_u64("WBETL_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("WBETL_USER_AGENT", "wbetl/0.1 (seller-analytics)");
    let max_retries = parse_u32("WBETL_MAX_RETRIES", "3")?;
    if max_retries == 0 {
        return Err(invalid(
            "WBETL_MAX_RETRIES",
            "must allow at least one attempt".to_string(),
        ));
    }
    let retry_backoff_secs = parse_u64("WBETL_RETRY_BACKOFF_SECS", "30")?;
    let rate_limit_default_secs = parse_u64("WBETL_RATE_LIMIT_DEFAULT_SECS", "30")?;
    let max_rate_limit_waits = parse_u32("WBETL_MAX_RATE_LIMIT_WAITS", "10")?;
    let max_concurrent_projects = parse_usize("WBETL_MAX_CONCURRENT_PROJECTS", "1")?;

    Ok(AppConfig {
        clickhouse_url,
        clickhouse_database,
        clickhouse_user,
        clickhouse_password,
        projects_path,
        log_level,
        advert_api_url,
        analytics_api_url,
        statistics_api_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_secs,
        rate_limit_default_secs,
        max_rate_limit_waits,
        max_concurrent_projects,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
