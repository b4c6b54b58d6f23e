//! Calendar window resolution in the plant's civil timezone.
//!
//! Every "today / yesterday / week / month" label used by reporting is turned
//! into a half-open `[start, end)` UTC range here, computed from civil local
//! midnights converted through the IANA timezone rules. Nothing in this module
//! reads a clock: the reference instant is always supplied by the caller.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A named or parameterized reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowLabel {
    Today,
    Yesterday,
    DayBeforeYesterday,
    DaysAgo(u32),
    Week,
    Month { year: i32, month: u32 },
}

impl WindowLabel {
    /// Parse a CLI window spec: `today`, `yesterday`, `day-before`, `week`,
    /// a plain integer N (N civil days ago), or `YYYY-MM`.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "today" => return Ok(Self::Today),
            "yesterday" => return Ok(Self::Yesterday),
            "day-before" | "day-before-yesterday" => return Ok(Self::DayBeforeYesterday),
            "week" => return Ok(Self::Week),
            _ => {}
        }

        if let Ok(n) = s.parse::<u32>() {
            return Ok(Self::DaysAgo(n));
        }

        if let Ok((year, month)) = crate::utils::date::parse_month(s) {
            return Ok(Self::Month { year, month });
        }

        Err(AppError::InvalidWindow(s.to_string()))
    }

    /// Stable key used to index report output.
    pub fn key(&self) -> String {
        match self {
            Self::Today => "today".into(),
            Self::Yesterday => "yesterday".into(),
            Self::DayBeforeYesterday => "day-before".into(),
            Self::DaysAgo(n) => format!("{}-days-ago", n),
            Self::Week => "week".into(),
            Self::Month { year, month } => format!("{:04}-{:02}", year, month),
        }
    }
}

/// Half-open instant range: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolve a window label against a reference instant, in the civil timezone.
pub fn resolve(label: &WindowLabel, now: DateTime<Utc>, tz: Tz) -> AppResult<Window> {
    let today = civil_date(now, tz);

    match label {
        WindowLabel::Today => Ok(day_window(today, tz)),
        WindowLabel::Yesterday => Ok(day_window(today - Duration::days(1), tz)),
        WindowLabel::DayBeforeYesterday => Ok(day_window(today - Duration::days(2), tz)),
        WindowLabel::DaysAgo(n) => Ok(day_window(today - Duration::days(i64::from(*n)), tz)),
        WindowLabel::Week => {
            // Rolling 7 civil days ending at today's end, not a calendar week.
            let first = day_window(today - Duration::days(6), tz);
            let last = day_window(today, tz);
            Ok(Window {
                start: first.start,
                end: last.end,
            })
        }
        WindowLabel::Month { year, month } => month_window(*year, *month, tz),
    }
}

/// Calendar date of an instant in the civil timezone.
pub fn civil_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Day bucket key (`YYYY-MM-DD`) of an instant in the civil timezone.
pub fn day_key(instant: DateTime<Utc>, tz: Tz) -> String {
    civil_date(instant, tz).format("%Y-%m-%d").to_string()
}

/// Civil (year, month) of an instant.
pub fn civil_month(instant: DateTime<Utc>, tz: Tz) -> (i32, u32) {
    let d = civil_date(instant, tz);
    (d.year(), d.month())
}

/// `[midnight, next midnight)` of a civil date.
pub fn day_window(date: NaiveDate, tz: Tz) -> Window {
    Window {
        start: local_midnight_utc(date, tz),
        end: local_midnight_utc(date + Duration::days(1), tz),
    }
}

/// `[first 00:00, first-of-next 00:00)` of a civil month.
pub fn month_window(year: i32, month: u32, tz: Tz) -> AppResult<Window> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidMonth(format!("{:04}-{:02}", year, month)))?;
    let next = crate::utils::date::first_of_next_month(year, month)
        .ok_or_else(|| AppError::InvalidMonth(format!("{:04}-{:02}", year, month)))?;
    Ok(Window {
        start: local_midnight_utc(first, tz),
        end: local_midnight_utc(next, tz),
    })
}

/// Instant of a civil wall-clock time on a given date (e.g. the 23:59 cutoff).
pub fn civil_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    resolve_local(date, time, tz)
}

/// Convert a civil local midnight to UTC.
///
/// Day-boundary math must follow the timezone's calendar day, never a fixed
/// offset. If the wall-clock time does not exist (DST gap) the first valid
/// instant after it is used; if it is ambiguous the earlier one wins.
fn local_midnight_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    resolve_local(date, NaiveTime::MIN, tz)
}

fn resolve_local(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let mut naive = date.and_time(time);
    // Step forward through a DST gap minute by minute; gaps are at most an
    // hour or two in any real zone, so this terminates quickly.
    for _ in 0..=180 {
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return dt.with_timezone(&Utc);
        }
        naive += Duration::minutes(1);
    }
    // Unreachable for IANA zones; fall back to interpreting the wall time as UTC.
    naive.and_utc()
}
