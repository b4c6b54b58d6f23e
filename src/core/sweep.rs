//! Auto-close safety net: force-close attendance periods still open at the
//! daily cutoff.
//!
//! The sweep only ever touches *today* (in the civil timezone of the supplied
//! `now`). Past days left open while the process was down are an explicit
//! admin problem, never silently rewritten.

use crate::calendar;
use crate::db::{attendance, log};
use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;

/// What one sweep pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Periods this pass force-closed.
    pub closed: Vec<i64>,
    /// Open periods found but closed by somebody else mid-sweep (benign).
    pub lost_races: usize,
    /// Per-period store failures (logged, sweep continued).
    pub failures: usize,
}

impl SweepOutcome {
    pub fn nothing_to_do(&self) -> bool {
        self.closed.is_empty() && self.lost_races == 0 && self.failures == 0
    }
}

/// Run one sweep pass for the civil day containing `now`.
///
/// Before the cutoff this is a no-op. At or after it, every still-open period
/// of the day is closed at the cutoff instant via the conditional-close
/// primitive, which makes the pass idempotent: a second run simply finds
/// nothing open. A per-period failure is logged and the scan continues.
pub fn sweep_day(
    conn: &Connection,
    now: DateTime<Utc>,
    tz: Tz,
    cutoff: NaiveTime,
) -> AppResult<SweepOutcome> {
    let today = calendar::civil_date(now, tz);
    let cutoff_instant = calendar::civil_instant(today, cutoff, tz);

    let mut outcome = SweepOutcome::default();

    if now < cutoff_instant {
        return Ok(outcome);
    }

    let day_key = calendar::day_key(now, tz);
    let open_ids = attendance::open_period_ids(conn, &day_key)?;

    for id in open_ids {
        match attendance::force_close(conn, id, cutoff_instant) {
            Ok(true) => {
                outcome.closed.push(id);
                // Ops logging is best-effort; a bad log write must not stall
                // the safety net for the remaining workers.
                let _ = log::record(
                    conn,
                    now,
                    "force_close",
                    &id.to_string(),
                    &format!("auto-closed at {} for {}", cutoff, day_key),
                );
            }
            // A manual clock-out won the race; the period is closed either way.
            Ok(false) => outcome.lost_races += 1,
            Err(e) => {
                outcome.failures += 1;
                warning(format!("sweep: failed to close period {}: {}", id, e));
                // Logging the failure is best-effort too.
                let _ = log::record(
                    conn,
                    now,
                    "sweep_error",
                    &id.to_string(),
                    &e.to_string(),
                );
            }
        }
    }

    if !outcome.closed.is_empty() {
        let _ = log::record(
            conn,
            now,
            "sweep",
            &day_key,
            &format!("force-closed {} period(s)", outcome.closed.len()),
        );
    }

    Ok(outcome)
}
