//! Edit Audit Log: field-level before/after records for admin edits.
//! Append-only; there is deliberately no update or delete path.

use crate::errors::{AppError, AppResult};
use crate::models::edit_log::{EditField, EditLogEntry};
use crate::utils::time::format_instant;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

/// Append one entry. Only ever called from inside `admin_set`'s transaction,
/// which ties every logged change to a store mutation that actually happened.
pub fn append(
    conn: &Connection,
    period_id: i64,
    field: EditField,
    old_value: &str,
    new_value: &str,
    editor_id: &str,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO edit_log (period_id, field, old_value, new_value, editor_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    stmt.execute(params![
        period_id,
        field.to_db_str(),
        old_value,
        new_value,
        editor_id,
        format_instant(now),
    ])?;
    Ok(())
}

fn map_row(row: &Row) -> rusqlite::Result<EditLogEntry> {
    let field_str: String = row.get("field")?;
    let field = EditField::from_db_str(&field_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("invalid edit field: {}", field_str))),
        )
    })?;

    Ok(EditLogEntry {
        id: row.get("id")?,
        period_id: row.get("period_id")?,
        field,
        old_value: row.get("old_value")?,
        new_value: row.get("new_value")?,
        editor_id: row.get("editor_id")?,
        created_at: row.get("created_at")?,
    })
}

/// Entries for a period, chronological, oldest first.
pub fn list_for(conn: &Connection, period_id: i64) -> AppResult<Vec<EditLogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM edit_log WHERE period_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map([period_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
