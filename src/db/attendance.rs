//! Attendance Store: one period per worker per civil day.
//!
//! Manual clock-out and the auto-close sweep share the same conditional
//! "close if still open" update, so concurrent closes have exactly one winner.

use crate::db::edit_log;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendancePeriod, PeriodState, SYSTEM_DEVICE};
use crate::models::edit_log::EditField;
use crate::utils::time::{format_instant, parse_instant};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, Result, Row, params};

pub fn map_row(row: &Row) -> Result<AttendancePeriod> {
    let in_str: String = row.get("clock_in_at")?;
    let clock_in = parse_instant(&in_str).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidInstant(in_str.clone())),
        )
    })?;

    let out_str: Option<String> = row.get("clock_out_at")?;
    let clock_out = match out_str {
        Some(s) => Some(parse_instant(&s).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidInstant(s.clone())),
            )
        })?),
        None => None,
    };

    Ok(AttendancePeriod {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        day_key: row.get("day_key")?,
        clock_in,
        clock_in_device: row.get("clock_in_device")?,
        state: PeriodState::from_columns(clock_out, row.get("clock_out_device")?),
    })
}

pub fn get_by_id(conn: &Connection, id: i64) -> AppResult<Option<AttendancePeriod>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM attendance_periods WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_row)?;
    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// Current period for a worker on a civil day, if any.
pub fn get_status(
    conn: &Connection,
    worker_id: &str,
    day_key: &str,
) -> AppResult<Option<AttendancePeriod>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance_periods WHERE worker_id = ?1 AND day_key = ?2",
    )?;
    let mut rows = stmt.query_map(params![worker_id, day_key], map_row)?;
    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// First clock-in of the day creates the period.
///
/// A second clock-in on the same day is rejected whether the existing period
/// is open or closed: there is exactly one period per worker per day, and
/// corrections go through `admin_set`.
pub fn clock_in(
    conn: &Connection,
    worker_id: &str,
    day_key: &str,
    instant: DateTime<Utc>,
    device: &str,
) -> AppResult<AttendancePeriod> {
    if get_status(conn, worker_id, day_key)?.is_some() {
        return Err(AppError::AlreadyClockedIn {
            worker: worker_id.to_string(),
            day: day_key.to_string(),
        });
    }

    let res = conn.execute(
        "INSERT INTO attendance_periods
             (worker_id, day_key, clock_in_at, clock_out_at, clock_in_device, clock_out_device)
         VALUES (?1, ?2, ?3, NULL, ?4, NULL)",
        params![worker_id, day_key, format_instant(instant), device],
    );

    match res {
        Ok(_) => {}
        // UNIQUE(worker_id, day_key): lost the race against another clock-in.
        Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            return Err(AppError::AlreadyClockedIn {
                worker: worker_id.to_string(),
                day: day_key.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    let id = conn.last_insert_rowid();
    get_by_id(conn, id)?.ok_or(AppError::PeriodNotFound(id))
}

/// Worker-initiated clock-out.
///
/// Errors: `NotClockedIn` (no period that day), `InvalidRange` (instant before
/// clock-in), `AlreadyClosed` (closed already, or lost the race against the
/// sweep or another clock-out).
pub fn clock_out(
    conn: &Connection,
    worker_id: &str,
    day_key: &str,
    instant: DateTime<Utc>,
    device: &str,
) -> AppResult<AttendancePeriod> {
    let period = get_status(conn, worker_id, day_key)?.ok_or_else(|| AppError::NotClockedIn {
        worker: worker_id.to_string(),
        day: day_key.to_string(),
    })?;

    if !period.is_open() {
        return Err(AppError::AlreadyClosed(format!(
            "attendance period {}",
            period.id
        )));
    }
    if instant < period.clock_in {
        return Err(AppError::InvalidRange(format!(
            "clock-out {} precedes clock-in {}",
            format_instant(instant),
            format_instant(period.clock_in)
        )));
    }

    if !close_if_open(conn, period.id, instant, device)? {
        return Err(AppError::AlreadyClosed(format!(
            "attendance period {}",
            period.id
        )));
    }

    get_by_id(conn, period.id)?.ok_or(AppError::PeriodNotFound(period.id))
}

/// The shared conditional close primitive. Returns true if this call closed
/// the period, false if it was already closed (a benign no-op for the sweep).
pub fn close_if_open(
    conn: &Connection,
    period_id: i64,
    instant: DateTime<Utc>,
    device: &str,
) -> AppResult<bool> {
    let updated = conn.execute(
        "UPDATE attendance_periods
         SET clock_out_at = ?1, clock_out_device = ?2
         WHERE id = ?3 AND clock_out_at IS NULL",
        params![format_instant(instant), device, period_id],
    )?;
    Ok(updated == 1)
}

/// Force-close an open period at the daily cutoff, on behalf of the sweep.
///
/// The clock-out is clamped to the clock-in instant when someone clocked in
/// after the cutoff (inside the day's final minute), keeping the ordering
/// invariant intact. Already-closed periods are a no-op.
pub fn force_close(
    conn: &Connection,
    period_id: i64,
    cutoff: DateTime<Utc>,
) -> AppResult<bool> {
    let period = get_by_id(conn, period_id)?.ok_or(AppError::PeriodNotFound(period_id))?;
    let out = cutoff.max(period.clock_in);
    close_if_open(conn, period_id, out, SYSTEM_DEVICE)
}

/// All periods for a civil day, every worker.
pub fn list_by_day(conn: &Connection, day_key: &str) -> AppResult<Vec<AttendancePeriod>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance_periods WHERE day_key = ?1 ORDER BY clock_in_at ASC",
    )?;
    let rows = stmt.query_map([day_key], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Ids of still-open periods for a civil day (the sweep's scan set).
pub fn open_period_ids(conn: &Connection, day_key: &str) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id FROM attendance_periods
         WHERE day_key = ?1 AND clock_out_at IS NULL
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([day_key], |row| row.get::<_, i64>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Administrator edit of clock-in and/or clock-out.
///
/// Runs in one transaction: re-validates the ordering invariant against the
/// final values, updates the row, and appends one audit entry per changed
/// field. An edit that would reorder the period fails with `InvalidRange`
/// instead of being silently fixed up.
pub fn admin_set(
    conn: &mut Connection,
    period_id: i64,
    new_clock_in: Option<DateTime<Utc>>,
    new_clock_out: Option<DateTime<Utc>>,
    editor_id: &str,
    now: DateTime<Utc>,
) -> AppResult<AttendancePeriod> {
    let tx = conn.transaction()?;

    let period = {
        let mut stmt = tx.prepare_cached("SELECT * FROM attendance_periods WHERE id = ?1")?;
        let mut rows = stmt.query_map([period_id], map_row)?;
        match rows.next() {
            Some(r) => r?,
            None => return Err(AppError::PeriodNotFound(period_id)),
        }
    };

    let final_in = new_clock_in.unwrap_or(period.clock_in);
    let final_out = new_clock_out.or(period.clock_out());

    if let Some(out) = final_out
        && out < final_in
    {
        return Err(AppError::InvalidRange(format!(
            "clock-out {} precedes clock-in {}",
            format_instant(out),
            format_instant(final_in)
        )));
    }

    if let Some(new_in) = new_clock_in
        && new_in != period.clock_in
    {
        tx.execute(
            "UPDATE attendance_periods SET clock_in_at = ?1 WHERE id = ?2",
            params![format_instant(new_in), period_id],
        )?;
        edit_log::append(
            &tx,
            period_id,
            EditField::ClockIn,
            &format_instant(period.clock_in),
            &format_instant(new_in),
            editor_id,
            now,
        )?;
    }

    if let Some(new_out) = new_clock_out
        && Some(new_out) != period.clock_out()
    {
        tx.execute(
            "UPDATE attendance_periods SET clock_out_at = ?1 WHERE id = ?2",
            params![format_instant(new_out), period_id],
        )?;
        let old = period
            .clock_out()
            .map(format_instant)
            .unwrap_or_default();
        edit_log::append(
            &tx,
            period_id,
            EditField::ClockOut,
            &old,
            &format_instant(new_out),
            editor_id,
            now,
        )?;
    }

    tx.commit()?;

    get_by_id(conn, period_id)?.ok_or(AppError::PeriodNotFound(period_id))
}

/// Deleting attendance rows is intentionally unsupported: the table is the
/// audit substrate. Corrections must go through `admin_set`.
pub fn delete_period(_conn: &Connection, _period_id: i64) -> AppResult<()> {
    Err(AppError::DeleteUnsupported)
}
