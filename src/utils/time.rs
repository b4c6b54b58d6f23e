//! Time utilities: parsing HH:MM, instant parsing/formatting, etc.
//!
//! Instants are persisted as UTC text in a fixed `%Y-%m-%dT%H:%M:%SZ` layout,
//! so lexicographic comparison inside SQLite matches chronological order.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

const INSTANT_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

/// Format an instant for storage.
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.format(INSTANT_FMT).to_string()
}

/// Parse an instant in the storage layout (also accepts full RFC 3339).
pub fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, INSTANT_FMT) {
        return Ok(ndt.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidInstant(s.to_string()))
}

/// Parse a user-supplied reference instant (the `--at` flag).
///
/// Accepts RFC 3339 (`2024-03-10T12:00:00Z`, with offset) or a naive
/// `YYYY-MM-DD HH:MM[:SS]` which is interpreted in the civil timezone.
pub fn parse_at(s: &str, tz: Tz) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| AppError::InvalidInstant(s.to_string()))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidInstant(s.to_string()))
}

/// Render an instant in the civil timezone for display.
pub fn civil_display(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}
