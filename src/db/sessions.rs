//! Work Session Store.
//!
//! All mutating paths funnel through conditional writes ("close if still
//! open"), so a race between two stop attempts leaves exactly one winner and
//! the loser observes `AlreadyClosed`.

use crate::calendar::Window;
use crate::errors::{AppError, AppResult};
use crate::models::session::{SessionState, WorkSession};
use crate::utils::time::{format_instant, parse_instant};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, Result, Row, params};

pub fn map_row(row: &Row) -> Result<WorkSession> {
    let start_str: String = row.get("start_at")?;
    let start = parse_instant(&start_str).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidInstant(start_str.clone())),
        )
    })?;

    let end_str: Option<String> = row.get("end_at")?;
    let end = match end_str {
        Some(s) => Some(parse_instant(&s).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidInstant(s.clone())),
            )
        })?),
        None => None,
    };

    Ok(WorkSession {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        vehicle_id: row.get("vehicle_id")?,
        process_id: row.get("process_id")?,
        start,
        state: SessionState::from_end(end),
        description: row.get("description")?,
        deleted: row.get::<_, i64>("deleted")? == 1,
        created_at: row.get("created_at")?,
    })
}

fn get_by_id(conn: &Connection, id: i64) -> AppResult<Option<WorkSession>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM work_sessions WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_row)?;
    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// Start a new session with a null end.
///
/// Fails with `OpenSessionConflict` if the worker already has one open. The
/// partial unique index on `(worker_id) WHERE end_at IS NULL` backs the
/// pre-check, so a concurrent insert cannot slip a second open session in.
pub fn start_session(
    conn: &Connection,
    worker_id: &str,
    vehicle_id: &str,
    process_id: &str,
    start: DateTime<Utc>,
    description: Option<&str>,
) -> AppResult<WorkSession> {
    let open_exists = {
        let mut stmt = conn.prepare_cached(
            "SELECT 1 FROM work_sessions
             WHERE worker_id = ?1 AND end_at IS NULL AND deleted = 0
             LIMIT 1",
        )?;
        stmt.exists([worker_id])?
    };
    if open_exists {
        return Err(AppError::OpenSessionConflict(worker_id.to_string()));
    }

    // created_at is stamped by the schema default: it records row insertion,
    // never the (possibly backdated) start instant.
    let res = conn.execute(
        "INSERT INTO work_sessions
             (worker_id, vehicle_id, process_id, start_at, end_at, description, deleted)
         VALUES (?1, ?2, ?3, ?4, NULL, ?5, 0)",
        params![
            worker_id,
            vehicle_id,
            process_id,
            format_instant(start),
            description.unwrap_or(""),
        ],
    );

    match res {
        Ok(_) => {}
        // Lost the race against another insert for the same worker.
        Err(e) if is_constraint_violation(&e) => {
            return Err(AppError::OpenSessionConflict(worker_id.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let id = conn.last_insert_rowid();
    get_by_id(conn, id)?.ok_or(AppError::SessionNotFound(id))
}

/// Set the end instant of an open session.
///
/// Errors: `SessionNotFound`, `InvalidRange` (end before start),
/// `AlreadyClosed` (including losing a race against a concurrent stop).
pub fn stop_session(conn: &Connection, id: i64, end: DateTime<Utc>) -> AppResult<WorkSession> {
    let session = get_by_id(conn, id)?
        .filter(|s| !s.deleted)
        .ok_or(AppError::SessionNotFound(id))?;

    if !session.is_open() {
        return Err(AppError::AlreadyClosed(format!("work session {}", id)));
    }
    if end < session.start {
        return Err(AppError::InvalidRange(format!(
            "end {} precedes start {}",
            format_instant(end),
            format_instant(session.start)
        )));
    }

    let updated = conn.execute(
        "UPDATE work_sessions SET end_at = ?1 WHERE id = ?2 AND end_at IS NULL",
        params![format_instant(end), id],
    )?;
    if updated == 0 {
        return Err(AppError::AlreadyClosed(format!("work session {}", id)));
    }

    get_by_id(conn, id)?.ok_or(AppError::SessionNotFound(id))
}

/// All open, non-deleted sessions. Live durations are the caller's business:
/// annotate with one `now` per request.
pub fn active_sessions(conn: &Connection) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM work_sessions
         WHERE end_at IS NULL AND deleted = 0
         ORDER BY start_at ASC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sessions whose start falls inside the given civil-day window.
pub fn list_by_civil_day(conn: &Connection, window: Window) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM work_sessions
         WHERE deleted = 0 AND start_at >= ?1 AND start_at < ?2
         ORDER BY start_at ASC",
    )?;
    let rows = stmt.query_map(
        params![format_instant(window.start), format_instant(window.end)],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sessions overlapping the window, not merely starting in it. An open
/// session qualifies whenever it started before the window's end; whether it
/// really overlaps depends on the caller's `now` and is settled during
/// aggregation.
pub fn list_overlapping(conn: &Connection, window: Window) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM work_sessions
         WHERE deleted = 0
           AND start_at < ?2
           AND (end_at IS NULL OR end_at > ?1)
         ORDER BY start_at ASC",
    )?;
    let rows = stmt.query_map(
        params![format_instant(window.start), format_instant(window.end)],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Soft administrative delete. Rows are kept for the audit trail.
pub fn soft_delete(conn: &Connection, id: i64) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE work_sessions SET deleted = 1 WHERE id = ?1 AND deleted = 0",
        [id],
    )?;
    if updated == 0 {
        return Err(AppError::SessionNotFound(id));
    }
    Ok(())
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
}
