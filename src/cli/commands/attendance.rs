//! Attendance commands: clock-in, clock-out, status.
//! The civil day key is derived from the reference instant, never from UTC.

use crate::calendar;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::attendance;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::formatting::mins2readable;
use crate::utils::time::civil_display;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let tz = cfg.tz()?;
    let now = super::resolve_now(cli.at.as_ref(), tz)?;
    let day_key = calendar::day_key(now, tz);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    match &cli.command {
        Commands::ClockIn { worker, device } => {
            let period = attendance::clock_in(&pool.conn, worker, &day_key, now, device)?;
            success(format!(
                "{} clocked in on {} at {} ({})",
                period.worker_id,
                period.day_key,
                civil_display(period.clock_in, tz),
                period.clock_in_device
            ));
        }

        Commands::ClockOut { worker, device } => {
            let period = attendance::clock_out(&pool.conn, worker, &day_key, now, device)?;
            success(format!(
                "{} clocked out on {} ({} worked)",
                period.worker_id,
                period.day_key,
                mins2readable(period.work_minutes(now), false)
            ));
        }

        Commands::Status { worker } => match attendance::get_status(&pool.conn, worker, &day_key)? {
            None => println!("{}: not clocked in on {}", worker, day_key),
            Some(p) if p.is_open() => println!(
                "{}: clocked in at {} ({} so far)",
                worker,
                civil_display(p.clock_in, tz),
                mins2readable(p.work_minutes(now), false)
            ),
            Some(p) => {
                let closer = if p.force_closed() { " [auto-closed]" } else { "" };
                println!(
                    "{}: {} → {}{} ({} worked)",
                    worker,
                    civil_display(p.clock_in, tz),
                    p.clock_out()
                        .map(|o| civil_display(o, tz))
                        .unwrap_or_else(|| "--:--".into()),
                    closer,
                    mins2readable(p.work_minutes(now), false)
                );
            }
        },

        _ => {}
    }

    Ok(())
}
