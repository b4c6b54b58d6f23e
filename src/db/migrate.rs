//! Schema creation and upgrades.
//! Instants are stored as UTC text (`YYYY-MM-DDTHH:MM:SSZ`): fixed-width, so
//! SQLite's lexicographic comparison matches chronological order.

use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the internal `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Work sessions: open-ended rows, `end_at` NULL while in progress.
/// The partial unique index is what makes "at most one open session per
/// worker" hold even under concurrent inserts.
fn create_work_sessions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id   TEXT NOT NULL,
            vehicle_id  TEXT NOT NULL,
            process_id  TEXT NOT NULL,
            start_at    TEXT NOT NULL,
            end_at      TEXT,
            description TEXT NOT NULL DEFAULT '',
            deleted     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_open
            ON work_sessions(worker_id) WHERE end_at IS NULL AND deleted = 0;
        CREATE INDEX IF NOT EXISTS idx_sessions_start ON work_sessions(start_at);
        CREATE INDEX IF NOT EXISTS idx_sessions_vehicle ON work_sessions(vehicle_id);
        "#,
    )?;
    Ok(())
}

/// Attendance: exactly one period per worker per civil day.
fn create_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_periods (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id        TEXT NOT NULL,
            day_key          TEXT NOT NULL,
            clock_in_at      TEXT NOT NULL,
            clock_out_at     TEXT,
            clock_in_device  TEXT NOT NULL DEFAULT '',
            clock_out_device TEXT,
            UNIQUE(worker_id, day_key)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_day ON attendance_periods(day_key);
        "#,
    )?;
    Ok(())
}

/// Append-only audit trail of administrator edits.
fn create_edit_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS edit_log (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            period_id  INTEGER NOT NULL,
            field      TEXT NOT NULL CHECK(field IN ('clock_in','clock_out')),
            old_value  TEXT NOT NULL DEFAULT '',
            new_value  TEXT NOT NULL,
            editor_id  TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_edit_log_period
            ON edit_log(period_id, created_at);
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Run all pending migrations. Safe to call on every startup.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    create_work_sessions_table(conn)?;
    create_attendance_table(conn)?;
    create_edit_log_table(conn)?;
    Ok(())
}

/// Quick integrity probe used by `db --check`.
pub fn check_schema(conn: &Connection) -> Result<Vec<(&'static str, bool)>> {
    let mut out = Vec::new();
    for name in ["work_sessions", "attendance_periods", "edit_log", "log"] {
        out.push((name, table_exists(conn, name)?));
    }
    Ok(out)
}
