//! Auto-close sweep: one-shot pass or resident scheduler.

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::scheduler::AutoCloseScheduler;
use crate::core::sweep::sweep_day;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Sweep { watch } = &cli.command {
        let tz = cfg.tz()?;
        let cutoff = cfg.cutoff()?;

        if *watch {
            info(format!(
                "Auto-close scheduler running (cutoff {}, tick {}s); Ctrl-C to stop",
                cfg.auto_close_cutoff,
                cfg.sweep_tick().as_secs()
            ));
            let _scheduler = AutoCloseScheduler::spawn(
                cfg.database.clone(),
                tz,
                cutoff,
                cfg.sweep_tick(),
            );
            // Resident mode: the scheduler thread does the work; park until
            // the process is terminated.
            loop {
                std::thread::park();
            }
        }

        let now = super::resolve_now(cli.at.as_ref(), tz)?;
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let outcome = sweep_day(&pool.conn, now, tz, cutoff)?;
        if outcome.nothing_to_do() {
            info("Sweep: nothing to do");
        } else {
            success(format!(
                "Sweep: {} closed, {} already closed, {} failed",
                outcome.closed.len(),
                outcome.lost_races,
                outcome.failures
            ));
        }
    }

    Ok(())
}
