//! Aggregation engine: multi-window rollups over work sessions.
//!
//! Pure read-side projector. `now` is derived once by the caller and used for
//! every open session in the call, so one report is internally consistent
//! even while sessions are being closed concurrently.

use crate::calendar::{self, WindowLabel};
use crate::core::duration;
use crate::db::sessions;
use crate::errors::AppResult;
use crate::models::report::{AggregateReport, AggregationBucket, GroupBy, VehicleMonthRow};
use crate::models::session::WorkSession;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use std::collections::{BTreeMap, HashMap};

/// Fallback group key when a process id has no category mapping.
pub const UNCATEGORIZED: &str = "uncategorized";

/// processId → category name, supplied by the caller (registry snapshot).
pub type CategoryMap = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct AggregateRequest {
    pub windows: Vec<WindowLabel>,
    pub group_by: GroupBy,
    pub vehicle_filter: Option<Vec<String>>,
}

struct BucketAcc {
    total_minutes: i64,
    count: usize,
    cross_day: bool,
    cross_month: bool,
}

/// Roll sessions into per-window buckets.
///
/// A session contributes to every window it overlaps, clipped to the overlap,
/// so a shift spanning midnight splits between "yesterday" and "today"
/// instead of landing wholly on one side.
pub fn aggregate(
    conn: &Connection,
    req: &AggregateRequest,
    categories: &CategoryMap,
    now: DateTime<Utc>,
    tz: Tz,
    implausible_open_minutes: i64,
) -> AppResult<AggregateReport> {
    let mut report = AggregateReport::default();
    let mut all_sessions: Vec<WorkSession> = Vec::new();

    for label in &req.windows {
        let window = calendar::resolve(label, now, tz)?;
        let mut sessions = sessions::list_overlapping(conn, window)?;

        if let Some(filter) = &req.vehicle_filter {
            sessions.retain(|s| filter.iter().any(|v| v == &s.vehicle_id));
        }

        let mut acc: BTreeMap<String, BucketAcc> = BTreeMap::new();

        for s in &sessions {
            let eff_end = s.effective_end(now);
            let minutes = duration::overlap_minutes(s.start, eff_end, window.start, window.end);
            if minutes <= 0 && eff_end <= window.start {
                // Open session listed for the window but ending (at `now`)
                // before it starts: no real overlap.
                continue;
            }

            let key = group_key(s, req.group_by, categories);
            let entry = acc.entry(key).or_insert(BucketAcc {
                total_minutes: 0,
                count: 0,
                cross_day: false,
                cross_month: false,
            });
            entry.total_minutes += minutes;
            entry.count += 1;
            if calendar::civil_date(s.start, tz) != calendar::civil_date(eff_end, tz) {
                entry.cross_day = true;
            }
            if calendar::civil_month(s.start, tz) != calendar::civil_month(eff_end, tz) {
                entry.cross_month = true;
            }
        }

        let window_key = label.key();
        let buckets = acc
            .into_iter()
            .map(|(group_key, b)| AggregationBucket {
                group_key,
                window: window_key.clone(),
                total_minutes: b.total_minutes,
                count: b.count,
                cross_day: b.cross_day,
                cross_month: b.cross_month,
            })
            .collect();
        report.windows.insert(window_key, buckets);

        all_sessions.extend(sessions);
    }

    report.warnings = duration::quality_warnings(&all_sessions, now, implausible_open_minutes);

    Ok(report)
}

/// Vehicle×month totals, with `is_cross_month` set per vehicle when any
/// contributing session's start and effective end fall in different civil
/// months.
pub fn vehicle_month_totals(
    conn: &Connection,
    year: i32,
    month: u32,
    now: DateTime<Utc>,
    tz: Tz,
) -> AppResult<Vec<VehicleMonthRow>> {
    let window = calendar::month_window(year, month, tz)?;
    let sessions = sessions::list_overlapping(conn, window)?;

    let mut acc: BTreeMap<String, BucketAcc> = BTreeMap::new();
    for s in &sessions {
        let eff_end = s.effective_end(now);
        let minutes = duration::overlap_minutes(s.start, eff_end, window.start, window.end);
        if minutes <= 0 && eff_end <= window.start {
            continue;
        }

        let entry = acc.entry(s.vehicle_id.clone()).or_insert(BucketAcc {
            total_minutes: 0,
            count: 0,
            cross_day: false,
            cross_month: false,
        });
        entry.total_minutes += minutes;
        entry.count += 1;
        if calendar::civil_month(s.start, tz) != calendar::civil_month(eff_end, tz) {
            entry.cross_month = true;
        }
    }

    Ok(acc
        .into_iter()
        .map(|(vehicle_id, b)| VehicleMonthRow {
            vehicle_id,
            total_minutes: b.total_minutes,
            count: b.count,
            is_cross_month: b.cross_month,
        })
        .collect())
}

fn group_key(s: &WorkSession, group_by: GroupBy, categories: &CategoryMap) -> String {
    match group_by {
        GroupBy::Vehicle => s.vehicle_id.clone(),
        GroupBy::Process => s.process_id.clone(),
        GroupBy::Category => categories
            .get(&s.process_id)
            .cloned()
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
    }
}
