//! The seven time-window definitions and their bucket keys.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// A fixed rule mapping a timestamp to a bucket key.
///
/// The first five windows are calendar-aligned truncations; the last two
/// key on a calendar component and are independent of the actual date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Hour,
    Day,
    Week,
    Month,
    Year,
    HourOfDay,
    DayOfWeek,
}

/// The derived key a sample lands under for one window.
///
/// Calendar windows produce an [`Instant`](BucketKey::Instant) (a truncated
/// timestamp); component windows produce an [`Ordinal`](BucketKey::Ordinal)
/// (hour 0–23 or weekday 0=Monday…6=Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Instant(NaiveDateTime),
    Ordinal(u32),
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Instant(ts) => write!(f, "{ts}"),
            BucketKey::Ordinal(n) => write!(f, "{n}"),
        }
    }
}

fn on_the_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    // hour comes from chrono accessors, always 0..=23
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).expect("hour is in range"))
}

impl Window {
    /// All seven definitions, in the order they appear in the report.
    pub const ALL: [Window; 7] = [
        Window::Hour,
        Window::Day,
        Window::Week,
        Window::Month,
        Window::Year,
        Window::HourOfDay,
        Window::DayOfWeek,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Window::Hour => "hour",
            Window::Day => "day",
            Window::Week => "week",
            Window::Month => "month",
            Window::Year => "year",
            Window::HourOfDay => "hour_of_day",
            Window::DayOfWeek => "day_of_week",
        }
    }

    /// Derives the bucket key for a timestamp under this window.
    ///
    /// The `week` key shifts the date back to the Monday of its week while
    /// keeping the time-of-day.
    pub fn bucket_key(self, ts: NaiveDateTime) -> BucketKey {
        match self {
            Window::Hour => BucketKey::Instant(on_the_hour(ts.date(), ts.hour())),
            Window::Day => BucketKey::Instant(on_the_hour(ts.date(), 0)),
            Window::Week => BucketKey::Instant(
                ts - Duration::days(i64::from(ts.weekday().num_days_from_monday())),
            ),
            Window::Month => BucketKey::Instant(on_the_hour(
                ts.date().with_day(1).expect("every month has a first day"),
                0,
            )),
            Window::Year => BucketKey::Instant(on_the_hour(
                NaiveDate::from_ymd_opt(ts.year(), 1, 1).expect("every year has a Jan 1"),
                0,
            )),
            Window::HourOfDay => BucketKey::Ordinal(ts.hour()),
            Window::DayOfWeek => BucketKey::Ordinal(ts.weekday().num_days_from_monday()),
        }
    }
}
