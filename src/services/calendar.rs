//! Calendar-month windows for time-bucketed series.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// One calendar month, `[start, end]` inclusive in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Window containing the month `months_back` months before `now`'s month.
    fn back_from(now: DateTime<Utc>, months_back: u32) -> Option<Self> {
        let index = now.year() * 12 + now.month0() as i32 - months_back as i32;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;

        let start = month_start(year, month)?;
        let next = if month == 12 {
            month_start(year + 1, 1)?
        } else {
            month_start(year, month + 1)?
        };

        Some(Self {
            year,
            month,
            start,
            end: next - Duration::microseconds(1),
        })
    }

    /// Short month name, e.g. `Oct`.
    pub fn label(&self) -> String {
        self.start.format("%b").to_string()
    }

    /// Month and year, e.g. `Oct 2026`.
    pub fn label_with_year(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Bounds in the timestamp format sent to the data service.
    pub fn bounds(&self) -> (String, String) {
        (timestamp(self.start), timestamp(self.end))
    }
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

/// RFC 3339 UTC timestamp with microsecond precision.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Start of `date` (UTC), for inclusive lower date filters.
pub fn day_start(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| timestamp(dt.and_utc()))
        .unwrap_or_else(|| date.to_string())
}

/// Last microsecond of `date` (UTC), so an upper date filter includes the whole day.
pub fn day_end(date: NaiveDate) -> String {
    date.and_hms_micro_opt(23, 59, 59, 999_999)
        .map(|dt| timestamp(dt.and_utc()))
        .unwrap_or_else(|| date.to_string())
}

/// The last `n` calendar months ending with `now`'s month, oldest first.
pub fn trailing_months(now: DateTime<Utc>, n: u32) -> Vec<MonthWindow> {
    (0..n)
        .rev()
        .filter_map(|back| MonthWindow::back_from(now, back))
        .collect()
}
