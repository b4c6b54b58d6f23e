//! Administrator commands: audited attendance edits, audit trail, deletes.

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::{attendance, edit_log, log, sessions};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::time::{civil_display, parse_at};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let tz = cfg.tz()?;
    let now = super::resolve_now(cli.at.as_ref(), tz)?;

    let mut pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    match &cli.command {
        Commands::AdminSet {
            period_id,
            new_in,
            new_out,
            editor,
        } => {
            if new_in.is_none() && new_out.is_none() {
                return Err(AppError::Other(
                    "admin-set needs --in and/or --out".to_string(),
                ));
            }

            let new_in = new_in.as_ref().map(|s| parse_at(s, tz)).transpose()?;
            let new_out = new_out.as_ref().map(|s| parse_at(s, tz)).transpose()?;

            let period =
                attendance::admin_set(&mut pool.conn, *period_id, new_in, new_out, editor, now)?;
            log::record(
                &pool.conn,
                now,
                "admin_set",
                &period_id.to_string(),
                &format!("edited by {}", editor),
            )?;

            success(format!(
                "Period {} updated: {} → {}",
                period.id,
                civil_display(period.clock_in, tz),
                period
                    .clock_out()
                    .map(|o| civil_display(o, tz))
                    .unwrap_or_else(|| "--:--".into())
            ));
        }

        Commands::Audit { period_id } => {
            let entries = edit_log::list_for(&pool.conn, *period_id)?;
            if entries.is_empty() {
                println!("No edits recorded for period {}.", period_id);
                return Ok(());
            }

            println!("AUDIT TRAIL for period {}:", period_id);
            for e in &entries {
                let old = if e.old_value.is_empty() {
                    "(unset)"
                } else {
                    &e.old_value
                };
                println!(
                    "- {} {} {}: {} → {}",
                    e.created_at,
                    e.editor_id,
                    e.field.to_db_str(),
                    old,
                    e.new_value
                );
            }
        }

        Commands::Del { session, period } => {
            if let Some(id) = period {
                // Attendance rows are the audit substrate; deleting them is
                // rejected no matter who asks.
                return attendance::delete_period(&pool.conn, *id);
            }
            if let Some(id) = session {
                sessions::soft_delete(&pool.conn, *id)?;
                log::record(&pool.conn, now, "soft_delete", &id.to_string(), "session")?;
                success(format!("Session {} soft-deleted", id));
                return Ok(());
            }
            return Err(AppError::Other(
                "del needs --session <id> or --period <id>".to_string(),
            ));
        }

        _ => {}
    }

    Ok(())
}
