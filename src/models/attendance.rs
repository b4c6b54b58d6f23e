//! Attendance period domain model: one row per worker per civil day.

use chrono::{DateTime, Utc};

/// Device string recorded when the auto-close sweep closes a period.
pub const SYSTEM_DEVICE: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodState {
    Open,
    Closed { out: DateTime<Utc>, device: String },
}

impl PeriodState {
    pub fn from_columns(out: Option<DateTime<Utc>>, device: Option<String>) -> Self {
        match out {
            Some(out) => Self::Closed {
                out,
                device: device.unwrap_or_default(),
            },
            None => Self::Open,
        }
    }

    pub fn clock_out(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Open => None,
            Self::Closed { out, .. } => Some(*out),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Debug, Clone)]
pub struct AttendancePeriod {
    pub id: i64,
    pub worker_id: String,
    pub day_key: String, // civil date, "YYYY-MM-DD"
    pub clock_in: DateTime<Utc>,
    pub clock_in_device: String,
    pub state: PeriodState,
}

impl AttendancePeriod {
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn clock_out(&self) -> Option<DateTime<Utc>> {
        self.state.clock_out()
    }

    pub fn clock_out_device(&self) -> Option<&str> {
        match &self.state {
            PeriodState::Open => None,
            PeriodState::Closed { device, .. } => Some(device),
        }
    }

    /// Minutes between clock-in and clock-out, live against `now` while open.
    pub fn work_minutes(&self, now: DateTime<Utc>) -> i64 {
        let end = self.state.clock_out().unwrap_or(now);
        (end - self.clock_in).num_minutes().max(0)
    }

    /// True if the period was closed by the auto-close sweep.
    pub fn force_closed(&self) -> bool {
        self.clock_out_device() == Some(SYSTEM_DEVICE)
    }
}
