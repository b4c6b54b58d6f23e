//! Work session domain model.

use chrono::{DateTime, Utc};

/// Lifecycle state of a work session.
///
/// Persisted as a nullable `end_at` column, but exposed as a two-variant type
/// so every consumer has to handle the open case explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed { end: DateTime<Utc> },
}

impl SessionState {
    pub fn from_end(end: Option<DateTime<Utc>>) -> Self {
        match end {
            Some(end) => Self::Closed { end },
            None => Self::Open,
        }
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Open => None,
            Self::Closed { end } => Some(*end),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Debug, Clone)]
pub struct WorkSession {
    pub id: i64,
    pub worker_id: String,
    pub vehicle_id: String,
    pub process_id: String,
    pub start: DateTime<Utc>,
    pub state: SessionState,
    pub description: String,
    pub deleted: bool,
    pub created_at: String, // ISO8601, bookkeeping only
}

impl WorkSession {
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.state.end()
    }

    /// Recorded end for closed sessions, the caller's `now` otherwise.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.state.end().unwrap_or(now)
    }

    /// Elapsed whole minutes, clamped at zero. An open session is measured
    /// against `now`; the raw (possibly negative) value is a data-quality
    /// signal handled by the duration calculator.
    pub fn minutes(&self, now: DateTime<Utc>) -> i64 {
        self.raw_minutes(now).max(0)
    }

    pub fn raw_minutes(&self, now: DateTime<Utc>) -> i64 {
        (self.effective_end(now) - self.start).num_minutes()
    }
}
