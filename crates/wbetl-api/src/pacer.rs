//! Every wait the client performs (fixed pacing, rate-limit waits, retry
//! back-off) goes through a [`Pacer`], so tests can observe exact durations
//! without sleeping and cancellation can cut any wait short.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub enum Pacer {
    /// Real `tokio::time::sleep`.
    #[default]
    Tokio,
    /// Records each requested pause and returns immediately.
    Recording(Arc<Mutex<Vec<Duration>>>),
}

impl Pacer {
    #[must_use]
    pub fn recording() -> Self {
        Pacer::Recording(Arc::new(Mutex::new(Vec::new())))
    }

    /// Waits `duration` unless `cancel` fires first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Cancelled`] if the token is cancelled before or
    /// during the wait.
    pub async fn pause(
        &self,
        duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        match self {
            Pacer::Tokio => {
                tokio::select! {
                    () = cancel.cancelled() => Err(ApiError::Cancelled),
                    () = tokio::time::sleep(duration) => Ok(()),
                }
            }
            Pacer::Recording(log) => {
                log.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(duration);
                Ok(())
            }
        }
    }

    /// Pauses recorded so far; always empty for [`Pacer::Tokio`].
    #[must_use]
    pub fn recorded(&self) -> Vec<Duration> {
        match self {
            Pacer::Tokio => Vec::new(),
            Pacer::Recording(log) => log.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }
}
