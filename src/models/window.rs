//! User-selected time window.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

/// Hour the default window starts at.
const DEFAULT_START_HOUR: i64 = 12;
/// Hour the default window ends at.
const DEFAULT_END_HOUR: i64 = 14;

/// A start/end pair of local wall-clock timestamps with minute precision.
///
/// Construction truncates seconds and sub-seconds but does not check ordering;
/// callers gate queries on [`TimeWindow::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a window, discarding seconds and sub-seconds from both ends.
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: truncate_to_minute(start),
            end: truncate_to_minute(end),
        }
    }

    /// The default window for a given day: 12:00 to 14:00.
    #[must_use]
    pub fn default_for(date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);
        Self {
            start: midnight + TimeDelta::hours(DEFAULT_START_HOUR),
            end: midnight + TimeDelta::hours(DEFAULT_END_HOUR),
        }
    }

    /// The default window for the current local day.
    #[must_use]
    pub fn today() -> Self {
        Self::default_for(Local::now().date_naive())
    }

    /// Start of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// End of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns a copy with a new start.
    #[must_use]
    pub fn with_start(self, start: NaiveDateTime) -> Self {
        Self::new(start, self.end)
    }

    /// Returns a copy with a new end.
    #[must_use]
    pub fn with_end(self, end: NaiveDateTime) -> Self {
        Self::new(self.start, end)
    }

    /// Whether the window starts strictly before it ends.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::today()
    }
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
