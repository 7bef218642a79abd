use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("WBETL_CLICKHOUSE_URL", "http://localhost:8123");
    m
}

#[test]
fn build_app_config_fails_without_clickhouse_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "WBETL_CLICKHOUSE_URL"),
        "expected MissingEnvVar(WBETL_CLICKHOUSE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_clickhouse_url() {
    let mut map = full_env();
    map.insert("WBETL_CLICKHOUSE_URL", "tcp://localhost:9000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBETL_CLICKHOUSE_URL"
        ),
        "expected InvalidEnvVar(WBETL_CLICKHOUSE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.clickhouse_database, "default");
    assert!(cfg.clickhouse_user.is_none());
    assert!(cfg.clickhouse_password.is_none());
    assert_eq!(cfg.projects_path.to_str(), Some("./config/projects.yaml"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.advert_api_url, DEFAULT_ADVERT_API_URL);
    assert_eq!(cfg.analytics_api_url, DEFAULT_ANALYTICS_API_URL);
    assert_eq!(cfg.statistics_api_url, DEFAULT_STATISTICS_API_URL);
    assert_eq!(cfg.request_timeout_secs, 60);
    assert_eq!(cfg.user_agent, "wbetl/0.1 (seller-analytics)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_secs, 30);
    assert_eq!(cfg.rate_limit_default_secs, 30);
    assert_eq!(cfg.max_rate_limit_waits, 10);
    assert_eq!(cfg.max_concurrent_projects, 1);
}

#[test]
fn clickhouse_credentials_are_read_when_present() {
    let mut map = full_env();
    map.insert("WBETL_CLICKHOUSE_USER", "user1");
    map.insert("WBETL_CLICKHOUSE_PASSWORD", "s3cret");
    map.insert("WBETL_CLICKHOUSE_DATABASE", "user1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.clickhouse_user.as_deref(), Some("user1"));
    assert_eq!(cfg.clickhouse_password.as_deref(), Some("s3cret"));
    assert_eq!(cfg.clickhouse_database, "user1");
}

#[test]
fn debug_output_redacts_clickhouse_password() {
    let mut map = full_env();
    map.insert("WBETL_CLICKHOUSE_PASSWORD", "s3cret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("s3cret"), "password leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn api_urls_drop_trailing_slash() {
    let mut map = full_env();
    map.insert("WBETL_ADVERT_API_URL", "http://127.0.0.1:9000/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.advert_api_url, "http://127.0.0.1:9000");
}

#[test]
fn statistics_api_url_override() {
    let mut map = full_env();
    map.insert("WBETL_STATISTICS_API_URL", "http://127.0.0.1:9100/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.statistics_api_url, "http://127.0.0.1:9100");
}

#[test]
fn api_url_without_scheme_is_invalid() {
    let mut map = full_env();
    map.insert("WBETL_ANALYTICS_API_URL", "seller-analytics-api.wildberries.ru");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBETL_ANALYTICS_API_URL"
        ),
        "expected InvalidEnvVar(WBETL_ANALYTICS_API_URL), got: {result:?}"
    );
}

#[test]
fn request_timeout_override() {
    let mut map = full_env();
    map.insert("WBETL_REQUEST_TIMEOUT_SECS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 90);
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("WBETL_REQUEST_TIMEOUT_SECS", "a minute");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBETL_REQUEST_TIMEOUT_SECS"
        ),
        "expected InvalidEnvVar(WBETL_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_zero_is_rejected() {
    let mut map = full_env();
    map.insert("WBETL_MAX_RETRIES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBETL_MAX_RETRIES"
        ),
        "expected InvalidEnvVar(WBETL_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn max_concurrent_projects_override() {
    let mut map = full_env();
    map.insert("WBETL_MAX_CONCURRENT_PROJECTS", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_projects, 4);
}

#[test]
fn max_concurrent_projects_invalid() {
    let mut map = full_env();
    map.insert("WBETL_MAX_CONCURRENT_PROJECTS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "WBETL_MAX_CONCURRENT_PROJECTS"
        ),
        "expected InvalidEnvVar(WBETL_MAX_CONCURRENT_PROJECTS), got: {result:?}"
    );
}

#[test]
fn rate_limit_settings_override() {
    let mut map = full_env();
    map.insert("WBETL_RATE_LIMIT_DEFAULT_SECS", "45");
    map.insert("WBETL_MAX_RATE_LIMIT_WAITS", "2");
    map.insert("WBETL_RETRY_BACKOFF_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.rate_limit_default_secs, 45);
    assert_eq!(cfg.max_rate_limit_waits, 2);
    assert_eq!(cfg.retry_backoff_secs, 5);
}
