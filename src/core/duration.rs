//! Duration calculator.
//!
//! Minutes are always floored whole minutes, clamped at zero on the way out.
//! A zero or negative raw duration is a data-quality signal, not an error.

use crate::models::report::QualityWarning;
use crate::models::session::WorkSession;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Default threshold after which an open session is flagged implausible.
pub const DEFAULT_IMPLAUSIBLE_OPEN_MINUTES: i64 = 960;

pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes()
}

/// Minutes a session contributes inside a `[w_start, w_end)` window, clipped
/// to the overlap. Open sessions pass `now` as their effective end.
pub fn overlap_minutes(
    start: DateTime<Utc>,
    effective_end: DateTime<Utc>,
    w_start: DateTime<Utc>,
    w_end: DateTime<Utc>,
) -> i64 {
    let lo = start.max(w_start);
    let hi = effective_end.min(w_end);
    if hi <= lo {
        return 0;
    }
    minutes_between(lo, hi)
}

/// Scan sessions for data-quality issues, deduplicated by session id.
pub fn quality_warnings(
    sessions: &[WorkSession],
    now: DateTime<Utc>,
    implausible_open_minutes: i64,
) -> Vec<QualityWarning> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for s in sessions {
        if !seen.insert(s.id) {
            continue;
        }
        let raw = s.raw_minutes(now);
        if raw <= 0 {
            out.push(QualityWarning::NonPositiveDuration { session_id: s.id });
        } else if s.is_open() && raw > implausible_open_minutes {
            out.push(QualityWarning::LongOpenSession {
                session_id: s.id,
                minutes: raw,
            });
        }
    }

    out
}
