use thiserror::Error;

/// Body fragment the full-stats endpoint returns when none of the requested
/// campaigns has data for the requested period.
pub(crate) const INVALID_INTERVAL_MESSAGE: &str = "no companies with correct intervals";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {endpoint} (retry after {retry_after_secs}s)")]
    RateLimited {
        endpoint: String,
        retry_after_secs: u64,
    },

    #[error("server error {status} from {endpoint}")]
    ServerError { status: u16, endpoint: String },

    #[error("request to {endpoint} rejected with HTTP {status}: {body}")]
    Permanent {
        status: u16,
        endpoint: String,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed response from {context}: {reason}")]
    Malformed { context: String, reason: String },

    #[error("run cancelled")]
    Cancelled,
}

impl ApiError {
    /// `true` when the upstream said the requested period has no valid campaigns.
    /// Every later chunk for the same period would fail the same way.
    #[must_use]
    pub fn is_invalid_interval(&self) -> bool {
        matches!(self, ApiError::Permanent { body, .. } if body.contains(INVALID_INTERVAL_MESSAGE))
    }

    /// `true` for responses that arrived but could not be read.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, ApiError::Deserialize { .. } | ApiError::Malformed { .. })
    }
}
