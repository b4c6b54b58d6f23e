//! Append-only audit entries for administrator edits of attendance periods.

use serde::Serialize;

/// Field of an attendance period that an administrator may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditField {
    ClockIn,
    ClockOut,
}

impl EditField {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EditField::ClockIn => "clock_in",
            EditField::ClockOut => "clock_out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "clock_in" => Some(EditField::ClockIn),
            "clock_out" => Some(EditField::ClockOut),
            _ => None,
        }
    }
}

/// One field-level before/after record. Immutable once written.
#[derive(Debug, Clone, Serialize)]
pub struct EditLogEntry {
    pub id: i64,
    pub period_id: i64,
    pub field: EditField,
    pub old_value: String, // stored instant text, "" when previously unset
    pub new_value: String,
    pub editor_id: String,
    pub created_at: String,
}
