//! Database info output for `db --info`.

use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let sessions: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM work_sessions", [], |row| row.get(0))?;
    let open_sessions: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM work_sessions WHERE end_at IS NULL AND deleted = 0",
        [],
        |row| row.get(0),
    )?;
    let periods: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM attendance_periods",
        [],
        |row| row.get(0),
    )?;
    let edits: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM edit_log", [], |row| row.get(0))?;

    println!(
        "{}• Work sessions:{} {}{}{} ({} open)",
        CYAN, RESET, GREEN, sessions, RESET, open_sessions
    );
    println!(
        "{}• Attendance periods:{} {}{}{}",
        CYAN, RESET, GREEN, periods, RESET
    );
    println!("{}• Edit log entries:{} {}{}{}", CYAN, RESET, GREEN, edits, RESET);

    //
    // 3) DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT start_at FROM work_sessions ORDER BY start_at ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT start_at FROM work_sessions ORDER BY start_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Session range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    Ok(())
}
