pub mod admin;
pub mod attendance;
pub mod config;
pub mod day;
pub mod db;
pub mod init;
pub mod log;
pub mod report;
pub mod session;
pub mod sweep;

use crate::errors::AppResult;
use crate::utils::time::parse_at;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Resolve the reference instant for this invocation.
///
/// Domain code never reads the clock itself; "now" is read exactly once here
/// (or overridden with `--at`) and threaded through every call.
pub fn resolve_now(at: Option<&String>, tz: Tz) -> AppResult<DateTime<Utc>> {
    match at {
        Some(s) => parse_at(s, tz),
        None => Ok(Utc::now()),
    }
}
