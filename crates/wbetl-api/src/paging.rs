//! Walk drivers for the pagination styles the seller API uses.
//!
//! Both drivers are partial-tolerant: a unit (chunk or page) that fails is
//! logged and counted, and whatever was accumulated is still returned in the
//! [`FetchReport`].

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::pacer::Pacer;

/// Maximum number of cursor pages to request before giving up.
/// Guards against an upstream that keeps answering `isNextPage: true`.
pub const MAX_PAGES: u32 = 200;

/// Consecutive unreadable cursor pages that end a walk.
pub const MAX_CONSECUTIVE_MALFORMED: u32 = 3;

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every chunk was sent, or the cursor reported its last page.
    Exhausted,
    /// The upstream named the requested period invalid; remaining chunks were skipped.
    InvalidInterval,
    /// A cursor page failed permanently or after all retries.
    Failed,
    /// The cursor kept returning unreadable pages.
    TooManyMalformed,
    /// [`MAX_PAGES`] was reached with more pages still announced.
    PageLimit,
    /// A keyed cursor returned a last key that did not move forward.
    Stalled,
    Cancelled,
}

/// Items accumulated by a walk plus per-unit bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport<T> {
    pub items: Vec<T>,
    pub units_ok: usize,
    pub units_failed: usize,
    pub stop: StopReason,
}

impl<T> FetchReport<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            units_ok: 0,
            units_failed: 0,
            stop: StopReason::Exhausted,
        }
    }

    /// `true` if any unit failed or the walk ended early.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.units_failed > 0 || self.stop != StopReason::Exhausted
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> FetchReport<U> {
        FetchReport {
            items: self.items.into_iter().map(f).collect(),
            units_ok: self.units_ok,
            units_failed: self.units_failed,
            stop: self.stop,
        }
    }
}

/// One decoded cursor page.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

/// Sends one request per `chunk_size` slice of `ids`, pausing `pause`
/// between requests.
pub(crate) async fn fetch_chunked<I, T, F, Fut>(
    ids: &[I],
    chunk_size: usize,
    pause: Duration,
    pacer: &Pacer,
    cancel: &CancellationToken,
    label: &str,
    mut fetch: F,
) -> FetchReport<T>
where
    I: Clone,
    F: FnMut(Vec<I>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut report = FetchReport::new();
    let total_chunks = ids.len().div_ceil(chunk_size.max(1));

    for (index, chunk) in ids.chunks(chunk_size.max(1)).enumerate() {
        if index > 0 && pacer.pause(pause, cancel).await.is_err() {
            report.stop = StopReason::Cancelled;
            break;
        }

        match fetch(chunk.to_vec()).await {
            Ok(items) => {
                tracing::debug!(
                    endpoint = label,
                    chunk = index + 1,
                    total_chunks,
                    items = items.len(),
                    "chunk fetched"
                );
                report.units_ok += 1;
                report.items.extend(items);
            }
            Err(ApiError::Cancelled) => {
                report.stop = StopReason::Cancelled;
                break;
            }
            Err(err) if err.is_invalid_interval() => {
                tracing::warn!(
                    endpoint = label,
                    chunk = index + 1,
                    total_chunks,
                    "upstream reports no campaigns with a valid interval, skipping remaining chunks"
                );
                report.units_failed += 1;
                report.stop = StopReason::InvalidInterval;
                break;
            }
            Err(err) => {
                tracing::error!(
                    endpoint = label,
                    chunk = index + 1,
                    total_chunks,
                    error = %err,
                    "chunk failed, continuing with the next one"
                );
                report.units_failed += 1;
            }
        }
    }

    report
}

/// Requests pages 1, 2, 3… until a page has no items or reports it is the
/// last one, pausing `pause` between requests.
///
/// An empty page contributes nothing. A page that says `has_next: false`
/// contributes its items and ends the walk.
pub(crate) async fn fetch_cursor<T, F, Fut>(
    pause: Duration,
    pacer: &Pacer,
    cancel: &CancellationToken,
    label: &str,
    mut fetch: F,
) -> FetchReport<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, ApiError>>,
{
    let mut report = FetchReport::new();
    let mut consecutive_malformed = 0u32;

    for page in 1..=MAX_PAGES {
        if page > 1 && pacer.pause(pause, cancel).await.is_err() {
            report.stop = StopReason::Cancelled;
            return report;
        }

        match fetch(page).await {
            Ok(CursorPage { items, has_next }) => {
                consecutive_malformed = 0;
                report.units_ok += 1;
                if items.is_empty() {
                    tracing::debug!(endpoint = label, page, "empty page, walk complete");
                    return report;
                }
                tracing::debug!(
                    endpoint = label,
                    page,
                    items = items.len(),
                    has_next,
                    "page fetched"
                );
                report.items.extend(items);
                if !has_next {
                    return report;
                }
            }
            Err(ApiError::Cancelled) => {
                report.stop = StopReason::Cancelled;
                return report;
            }
            Err(err) if err.is_malformed() => {
                consecutive_malformed += 1;
                report.units_failed += 1;
                tracing::warn!(
                    endpoint = label,
                    page,
                    consecutive_malformed,
                    error = %err,
                    "skipping unreadable page"
                );
                if consecutive_malformed >= MAX_CONSECUTIVE_MALFORMED {
                    report.stop = StopReason::TooManyMalformed;
                    return report;
                }
            }
            Err(err) => {
                tracing::error!(endpoint = label, page, error = %err, "page failed, ending walk");
                report.units_failed += 1;
                report.stop = StopReason::Failed;
                return report;
            }
        }
    }

    tracing::warn!(endpoint = label, max_pages = MAX_PAGES, "page limit reached");
    report.stop = StopReason::PageLimit;
    report
}

/// Walks a report keyed by the last row seen: each request passes the key of
/// the previous page's last item, starting from 0, pausing `pause` between
/// requests.
///
/// The walk ends on an empty page or a page shorter than `limit`. Any failed
/// request ends it too, since later pages cannot be addressed without it.
pub(crate) async fn fetch_keyed<T, K, F, Fut>(
    limit: usize,
    pause: Duration,
    pacer: &Pacer,
    cancel: &CancellationToken,
    label: &str,
    key_of: K,
    mut fetch: F,
) -> FetchReport<T>
where
    K: Fn(&T) -> i64,
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut report = FetchReport::new();
    let mut cursor = 0i64;

    for page in 1..=MAX_PAGES {
        if page > 1 && pacer.pause(pause, cancel).await.is_err() {
            report.stop = StopReason::Cancelled;
            return report;
        }

        let items = match fetch(cursor).await {
            Ok(items) => items,
            Err(ApiError::Cancelled) => {
                report.stop = StopReason::Cancelled;
                return report;
            }
            Err(err) => {
                tracing::error!(
                    endpoint = label,
                    page,
                    cursor,
                    error = %err,
                    "page failed, ending walk"
                );
                report.units_failed += 1;
                report.stop = StopReason::Failed;
                return report;
            }
        };

        report.units_ok += 1;
        let Some(next) = items.last().map(&key_of) else {
            tracing::debug!(endpoint = label, page, "empty page, walk complete");
            return report;
        };
        let short = items.len() < limit;
        tracing::debug!(
            endpoint = label,
            page,
            cursor,
            next,
            items = items.len(),
            "page fetched"
        );
        report.items.extend(items);
        if short {
            return report;
        }
        if next <= cursor {
            tracing::warn!(
                endpoint = label,
                page,
                cursor,
                next,
                "cursor did not advance, ending walk"
            );
            report.stop = StopReason::Stalled;
            return report;
        }
        cursor = next;
    }

    tracing::warn!(endpoint = label, max_pages = MAX_PAGES, "page limit reached");
    report.stop = StopReason::PageLimit;
    report
}

#[cfg(test)]
#[path = "paging_test.rs"]
mod tests;
