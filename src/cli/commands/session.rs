//! Work-session commands: start, stop, active.

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::sessions;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::mins2readable;
use crate::utils::time::civil_display;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let tz = cfg.tz()?;
    let now = super::resolve_now(cli.at.as_ref(), tz)?;

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    match &cli.command {
        Commands::Start {
            worker,
            vehicle,
            process,
            desc,
        } => {
            let session = sessions::start_session(
                &pool.conn,
                worker,
                vehicle,
                process,
                now,
                desc.as_deref(),
            )?;
            success(format!(
                "Session {} started for {} on {}/{} at {}",
                session.id,
                session.worker_id,
                session.vehicle_id,
                session.process_id,
                civil_display(session.start, tz)
            ));
        }

        Commands::Stop { session_id } => {
            let session = sessions::stop_session(&pool.conn, *session_id, now)?;
            success(format!(
                "Session {} stopped ({})",
                session.id,
                mins2readable(session.minutes(now), false)
            ));
        }

        Commands::Active => {
            let active = sessions::active_sessions(&pool.conn)?;
            if active.is_empty() {
                println!("No open sessions.");
                return Ok(());
            }

            println!("OPEN SESSIONS:");
            for s in &active {
                let mins = s.minutes(now);
                println!(
                    "- #{} {} {}/{} since {} ({})",
                    s.id,
                    s.worker_id,
                    s.vehicle_id,
                    s.process_id,
                    civil_display(s.start, tz),
                    mins2readable(mins, true)
                );
                if s.raw_minutes(now) > cfg.implausible_open_minutes {
                    warning(format!(
                        "session {} has been open for {} minutes",
                        s.id,
                        s.raw_minutes(now)
                    ));
                }
            }
        }

        _ => {}
    }

    Ok(())
}
