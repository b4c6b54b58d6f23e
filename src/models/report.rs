//! Read-side report rows produced by the aggregation engine.
//! Nothing here is persisted; buckets are recomputed on every request so that
//! open sessions contribute their live duration.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Grouping axis for rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupBy {
    Category,
    Vehicle,
    Process,
}

impl GroupBy {
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "category" => Some(GroupBy::Category),
            "vehicle" => Some(GroupBy::Vehicle),
            "process" => Some(GroupBy::Process),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Category => "category",
            GroupBy::Vehicle => "vehicle",
            GroupBy::Process => "process",
        }
    }
}

/// Total minutes and session count for one group key inside one window.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationBucket {
    pub group_key: String,
    pub window: String,
    pub total_minutes: i64,
    pub count: usize,
    /// At least one contributing session straddles a civil-day boundary.
    pub cross_day: bool,
    /// At least one contributing session straddles a civil-month boundary.
    pub cross_month: bool,
}

impl AggregationBucket {
    pub fn average_minutes(&self) -> i64 {
        if self.count == 0 {
            0
        } else {
            self.total_minutes / self.count as i64
        }
    }
}

/// Per-vehicle row of the vehicle×month report.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleMonthRow {
    pub vehicle_id: String,
    pub total_minutes: i64,
    pub count: usize,
    pub is_cross_month: bool,
}

/// Data-quality signal attached to read results. Warnings never block a
/// report; they flag rows an operator should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QualityWarning {
    NonPositiveDuration { session_id: i64 },
    LongOpenSession { session_id: i64, minutes: i64 },
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityWarning::NonPositiveDuration { session_id } => {
                write!(f, "session {} has a zero or negative duration", session_id)
            }
            QualityWarning::LongOpenSession {
                session_id,
                minutes,
            } => write!(
                f,
                "session {} has been open for {} minutes",
                session_id, minutes
            ),
        }
    }
}

/// Output of one `aggregate` call: buckets per window key, plus warnings.
#[derive(Debug, Default, Serialize)]
pub struct AggregateReport {
    pub windows: BTreeMap<String, Vec<AggregationBucket>>,
    pub warnings: Vec<QualityWarning>,
}
