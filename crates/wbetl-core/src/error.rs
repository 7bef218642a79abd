use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read projects file at {path}: {source}")]
    ProjectsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse projects file: {0}")]
    ProjectsFileParse(#[source] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),

    #[error("no project has an API key in the environment ({configured} configured)")]
    NoProjects { configured: usize },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("report window start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("report window must cover at least one day, got {0}")]
    EmptyWindow(u32),

    #[error("report window of {0} days reaches past the supported calendar")]
    WindowOutOfRange(u32),
}
