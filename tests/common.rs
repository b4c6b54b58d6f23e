#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn sl() -> Command {
    cargo_bin_cmd!("shiftledger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shiftledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Open an in-memory database with the full schema, for library-level tests.
pub fn mem_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    shiftledger::db::initialize::init_db(&conn).expect("init db");
    conn
}

/// The civil timezone used throughout the tests (the config default).
pub fn tz() -> Tz {
    chrono_tz::Asia::Tokyo
}

/// Build a UTC instant from civil wall-clock time in the test timezone.
pub fn civil(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    tz().with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}
