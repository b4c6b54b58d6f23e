//! Per-civil-day listing of sessions and attendance.

use crate::calendar;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::duration;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::{attendance, sessions};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use crate::utils::date::parse_date;
use crate::utils::formatting::mins2readable;
use crate::utils::time::civil_display;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Day {
        date,
        sessions: only_sessions,
        attendance: only_attendance,
    } = &cli.command
    {
        let tz = cfg.tz()?;
        let now = super::resolve_now(cli.at.as_ref(), tz)?;

        let day = match date {
            Some(s) => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))?,
            None => calendar::civil_date(now, tz),
        };
        let day_key = day.format("%Y-%m-%d").to_string();
        let window = calendar::day_window(day, tz);

        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let show_sessions = !only_attendance;
        let show_attendance = !only_sessions;

        println!("\n=== {} ===", day_key);

        if show_sessions {
            let rows = sessions::list_by_civil_day(&pool.conn, window)?;
            println!("SESSIONS:");
            if rows.is_empty() {
                println!("  (none)");
            }
            for s in &rows {
                let end = s
                    .end()
                    .map(|e| civil_display(e, tz))
                    .unwrap_or_else(|| "--:--".into());
                println!(
                    "  #{} {} {}/{} {} → {} ({})",
                    s.id,
                    s.worker_id,
                    s.vehicle_id,
                    s.process_id,
                    civil_display(s.start, tz),
                    end,
                    mins2readable(s.minutes(now), false)
                );
            }
            // Clamped minutes above, raw signal here: zero/negative or
            // implausibly long durations get the same warnings as reports.
            for w in duration::quality_warnings(&rows, now, cfg.implausible_open_minutes) {
                warning(w);
            }
        }

        if show_attendance {
            let rows = attendance::list_by_day(&pool.conn, &day_key)?;
            println!("ATTENDANCE:");
            if rows.is_empty() {
                println!("  (none)");
            }
            for p in &rows {
                let out = p
                    .clock_out()
                    .map(|o| civil_display(o, tz))
                    .unwrap_or_else(|| "--:--".into());
                let tag = if p.force_closed() { " [auto-closed]" } else { "" };
                println!(
                    "  #{} {} {} → {}{} ({})",
                    p.id,
                    p.worker_id,
                    civil_display(p.clock_in, tz),
                    out,
                    tag,
                    mins2readable(p.work_minutes(now), false)
                );
            }
        }
    }

    Ok(())
}
