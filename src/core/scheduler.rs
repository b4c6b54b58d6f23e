//! Recurring background sweep.
//!
//! A plain thread, woken on a short interval and additionally timed to land
//! exactly on the daily cutoff instant. Cancellation goes through an mpsc
//! channel; dropping the scheduler (or calling `shutdown`) stops the loop.
//! The loop never crashes the host process: store errors are logged and the
//! next tick retries. A cutoff missed while the process was down is picked up
//! by the first wake afterwards, because the sweep itself checks "is today's
//! cutoff already past" against stored state rather than remembering fires.

use crate::core::sweep::sweep_day;
use crate::db::initialize::init_db;
use crate::ui::messages::{info, warning};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

pub struct AutoCloseScheduler {
    tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoCloseScheduler {
    /// Spawn the sweep loop against the given database.
    ///
    /// `tick` is the fallback wake interval (the safety net's safety net);
    /// the loop also wakes at the exact cutoff instant.
    pub fn spawn(db_path: String, tz: Tz, cutoff: NaiveTime, tick: StdDuration) -> Self {
        let (tx, rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                let now = Utc::now();

                match Connection::open(&db_path) {
                    Ok(conn) => {
                        if let Err(e) = init_db(&conn) {
                            warning(format!("sweep: schema check failed: {}", e));
                        } else {
                            match sweep_day(&conn, now, tz, cutoff) {
                                Ok(outcome) if !outcome.closed.is_empty() => {
                                    info(format!(
                                        "sweep: force-closed {} period(s)",
                                        outcome.closed.len()
                                    ));
                                }
                                Ok(_) => {}
                                Err(e) => warning(format!("sweep failed, will retry: {}", e)),
                            }
                        }
                    }
                    Err(e) => warning(format!("sweep: cannot open database: {}", e)),
                }

                let wait = next_wakeup(Utc::now(), tz, cutoff, tick);
                match rx.recv_timeout(wait) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => continue,
                }
            }
        });

        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Stop the loop and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AutoCloseScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// How long to sleep before the next wake: the regular tick, shortened so one
/// wake lands exactly on today's (or tomorrow's) cutoff instant.
pub fn next_wakeup(
    now: DateTime<Utc>,
    tz: Tz,
    cutoff: NaiveTime,
    tick: StdDuration,
) -> StdDuration {
    let today = crate::calendar::civil_date(now, tz);
    let mut next_cutoff = crate::calendar::civil_instant(today, cutoff, tz);
    if next_cutoff <= now {
        next_cutoff = crate::calendar::civil_instant(today + Duration::days(1), cutoff, tz);
    }

    let until = (next_cutoff - now)
        .to_std()
        .unwrap_or(StdDuration::from_secs(0));

    until.min(tick)
}
