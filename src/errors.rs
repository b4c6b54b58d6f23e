//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid report window: {0}")]
    InvalidWindow(String),

    #[error("Invalid group-by key: {0}")]
    InvalidGroupBy(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    // ---------------------------
    // Ledger domain errors
    // ---------------------------
    #[error("Worker {0} already has an open work session")]
    OpenSessionConflict(String),

    #[error("Work session {0} not found")]
    SessionNotFound(i64),

    #[error("Attendance period {0} not found")]
    PeriodNotFound(i64),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Already closed: {0}")]
    AlreadyClosed(String),

    #[error("Worker {worker} is already clocked in on {day}")]
    AlreadyClockedIn { worker: String, day: String },

    #[error("Worker {worker} is not clocked in on {day}")]
    NotClockedIn { worker: String, day: String },

    #[error("Attendance periods cannot be deleted; use admin-set to correct them")]
    DeleteUnsupported,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
