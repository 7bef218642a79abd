//! Calendar-day handling for upstream timestamps and report windows.
//!
//! Upstream timestamps arrive in several shapes (`2024-12-01`,
//! `2024-12-01T00:00:00+03:00`, `2024-12-01 00:00:00`). They are all truncated
//! to the calendar day written in the string: the time of day and the offset
//! are dropped, never converted.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::CoreError;

/// Reads the leading `YYYY-MM-DD` of an upstream timestamp.
///
/// Returns `None` for anything that does not start with a valid date.
#[must_use]
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Reads a wall-clock timestamp, keeping the time of day but dropping any offset.
///
/// A bare date is read as midnight.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Some(head) = trimmed.get(..19) {
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(head, format) {
                return Some(ts);
            }
        }
    }
    parse_day(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Inclusive range of calendar days a job reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportWindow {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The `days` calendar days ending yesterday relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyWindow`] if `days` is zero and
    /// [`CoreError::WindowOutOfRange`] if the start falls before the
    /// earliest representable date.
    pub fn trailing(days: u32, today: NaiveDate) -> Result<Self, CoreError> {
        if days == 0 {
            return Err(CoreError::EmptyWindow(days));
        }
        let end = today.pred_opt().ok_or(CoreError::WindowOutOfRange(days))?;
        let start = end
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or(CoreError::WindowOutOfRange(days))?;
        Ok(Self { start, end })
    }

    /// Monday through Sunday of the week before the one containing `today`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::WindowOutOfRange`] near the earliest
    /// representable date.
    pub fn previous_week(today: NaiveDate) -> Result<Self, CoreError> {
        let back = u64::from(today.weekday().num_days_from_monday()) + 7;
        let start = today
            .checked_sub_days(Days::new(back))
            .ok_or(CoreError::WindowOutOfRange(7))?;
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or(CoreError::WindowOutOfRange(7))?;
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..={}", self.start, self.end)
        }
    }
}
