use std::fmt;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

pub const MIN_WINDOW_MINUTES: i64 = 1;
pub const MAX_WINDOW_MINUTES: i64 = 60;
pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

/// `2025-01-01T10:00:00.000Z`, the shape the log API expects for start/end dates.
const ISO_MILLIS_UTC: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Half-open `[start, end)` query window, always in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

/// Out-of-range requests are corrected, never rejected.
#[inline]
pub fn clamp_minutes(requested: i64) -> i64 {
    requested.clamp(MIN_WINDOW_MINUTES, MAX_WINDOW_MINUTES)
}

impl TimeWindow {
    /// Window ending at `now` and starting `clamp(requested, 1, 60)` minutes earlier.
    pub fn resolve(requested_minutes: i64, now: OffsetDateTime) -> Self {
        let end = now.to_offset(UtcOffset::UTC);
        let start = end - Duration::minutes(clamp_minutes(requested_minutes));
        Self { start, end }
    }

    /// Same as `resolve`, anchored at the current wall clock.
    pub fn last_minutes(requested_minutes: i64) -> Self {
        Self::resolve(requested_minutes, OffsetDateTime::now_utc())
    }

    pub fn start(&self) -> OffsetDateTime { self.start }
    pub fn end(&self) -> OffsetDateTime { self.end }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn start_param(&self) -> String {
        format_iso(self.start)
    }
    pub fn end_param(&self) -> String {
        format_iso(self.end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start_param(), self.end_param())
    }
}

/// Render an instant as ISO-8601 UTC with millisecond precision.
pub fn format_iso(ts: OffsetDateTime) -> String {
    ts.to_offset(UtcOffset::UTC)
        .format(ISO_MILLIS_UTC)
        .expect("four-digit years always fit the ISO millisecond format")
}
