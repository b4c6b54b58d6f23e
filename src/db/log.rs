//! Internal operations log (sweep runs, force-closes, admin edits).

use crate::errors::AppResult;
use crate::utils::time::format_instant;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};

/// Write an internal log line into the `log` table.
pub fn record(
    conn: &Connection,
    now: DateTime<Utc>,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![format_instant(now), operation, target, message])?;

    Ok(())
}

/// Load the ops log, newest first.
pub fn load_log(conn: &Connection) -> Result<Vec<(String, String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT date, operation, message FROM log ORDER BY date DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    Ok(out)
}
