mod common;
use common::{civil, mem_db};

use shiftledger::db::{attendance, edit_log};
use shiftledger::errors::AppError;
use shiftledger::models::edit_log::EditField;
use shiftledger::utils::time::format_instant;

const DAY: &str = "2025-09-01";

#[test]
fn test_clock_in_and_out() {
    let conn = mem_db();

    let p = attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();
    assert!(p.is_open());
    assert_eq!(p.day_key, DAY);
    assert_eq!(p.clock_in_device, "gate-1");

    let closed =
        attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-2").unwrap();
    assert!(!closed.is_open());
    assert_eq!(closed.clock_out_device(), Some("gate-2"));
    assert_eq!(closed.work_minutes(civil(2025, 9, 1, 23, 0)), 505);
}

#[test]
fn test_one_period_per_worker_per_day() {
    let conn = mem_db();

    attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();

    // While open
    let err =
        attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 9, 0), "gate-1").unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn { .. }));

    // Even after closing: re-opening a day goes through admin-set.
    attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();
    let err =
        attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 18, 0), "gate-1").unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn { .. }));

    // Another day is fine.
    attendance::clock_in(&conn, "w1", "2025-09-02", civil(2025, 9, 2, 8, 30), "gate-1").unwrap();
}

#[test]
fn test_clock_out_errors() {
    let conn = mem_db();

    let err =
        attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap_err();
    assert!(matches!(err, AppError::NotClockedIn { .. }));

    attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();

    let err =
        attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 8, 0), "gate-1").unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));

    attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();
    let err =
        attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 17, 5), "gate-1").unwrap_err();
    assert!(matches!(err, AppError::AlreadyClosed(_)));
}

#[test]
fn test_conditional_close_has_one_winner() {
    // Two concurrent close attempts funnel through the same conditional
    // update: the second observes "already closed".
    let conn = mem_db();
    let p = attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();

    let first =
        attendance::close_if_open(&conn, p.id, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();
    let second =
        attendance::close_if_open(&conn, p.id, civil(2025, 9, 1, 17, 2), "gate-2").unwrap();
    assert!(first);
    assert!(!second);

    // The winner's instant persisted.
    let read = attendance::get_status(&conn, "w1", DAY).unwrap().unwrap();
    assert_eq!(read.clock_out(), Some(civil(2025, 9, 1, 17, 0)));
    assert_eq!(read.clock_out_device(), Some("gate-1"));
}

#[test]
fn test_force_close_is_noop_after_manual_clock_out() {
    let conn = mem_db();
    let p = attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();
    attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();

    let closed = attendance::force_close(&conn, p.id, civil(2025, 9, 1, 23, 59)).unwrap();
    assert!(!closed);

    let read = attendance::get_status(&conn, "w1", DAY).unwrap().unwrap();
    assert_eq!(read.clock_out(), Some(civil(2025, 9, 1, 17, 0)));
    assert!(!read.force_closed());
}

#[test]
fn test_force_close_clamps_to_clock_in() {
    // Clock-in inside the final minute: force-close must not write out < in.
    let conn = mem_db();
    let p =
        attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 23, 59) + chrono::Duration::seconds(30), "gate-1")
            .unwrap();

    attendance::force_close(&conn, p.id, civil(2025, 9, 1, 23, 59)).unwrap();
    let read = attendance::get_by_id(&conn, p.id).unwrap().unwrap();
    assert_eq!(read.clock_out(), Some(read.clock_in));
    assert_eq!(read.work_minutes(civil(2025, 9, 2, 1, 0)), 0);
}

#[test]
fn test_admin_set_round_trip_with_audit() {
    let conn = &mut mem_db();

    let p = attendance::clock_in(conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();
    attendance::clock_out(conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();

    let edited = attendance::admin_set(
        conn,
        p.id,
        None,
        Some(civil(2025, 9, 1, 18, 0)),
        "admin-1",
        civil(2025, 9, 2, 9, 0),
    )
    .unwrap();
    assert_eq!(edited.clock_out(), Some(civil(2025, 9, 1, 18, 0)));

    // Exactly one entry, old 17:00, new 18:00.
    let entries = edit_log::list_for(conn, p.id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].field, EditField::ClockOut);
    assert_eq!(entries[0].old_value, format_instant(civil(2025, 9, 1, 17, 0)));
    assert_eq!(entries[0].new_value, format_instant(civil(2025, 9, 1, 18, 0)));
    assert_eq!(entries[0].editor_id, "admin-1");
}

#[test]
fn test_admin_set_both_fields_two_entries() {
    let conn = &mut mem_db();

    let p = attendance::clock_in(conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();
    attendance::clock_out(conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();

    attendance::admin_set(
        conn,
        p.id,
        Some(civil(2025, 9, 1, 8, 30)),
        Some(civil(2025, 9, 1, 17, 30)),
        "admin-1",
        civil(2025, 9, 2, 9, 0),
    )
    .unwrap();

    let entries = edit_log::list_for(conn, p.id).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].field, EditField::ClockIn);
    assert_eq!(entries[1].field, EditField::ClockOut);
}

#[test]
fn test_admin_set_rejects_reordering() {
    let conn = &mut mem_db();

    let p = attendance::clock_in(conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();
    attendance::clock_out(conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();

    // Moving clock-in past the existing clock-out must fail, not reorder.
    let err = attendance::admin_set(
        conn,
        p.id,
        Some(civil(2025, 9, 1, 18, 0)),
        None,
        "admin-1",
        civil(2025, 9, 2, 9, 0),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));

    // Nothing changed, nothing was logged.
    let read = attendance::get_by_id(conn, p.id).unwrap().unwrap();
    assert_eq!(read.clock_in, civil(2025, 9, 1, 8, 35));
    assert!(edit_log::list_for(conn, p.id).unwrap().is_empty());
}

#[test]
fn test_admin_set_noop_logs_nothing() {
    let conn = &mut mem_db();

    let p = attendance::clock_in(conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();
    attendance::clock_out(conn, "w1", DAY, civil(2025, 9, 1, 17, 0), "gate-1").unwrap();

    // Setting the same values again is not an edit.
    attendance::admin_set(
        conn,
        p.id,
        Some(civil(2025, 9, 1, 8, 35)),
        Some(civil(2025, 9, 1, 17, 0)),
        "admin-1",
        civil(2025, 9, 2, 9, 0),
    )
    .unwrap();
    assert!(edit_log::list_for(conn, p.id).unwrap().is_empty());
}

#[test]
fn test_delete_period_always_rejected() {
    let conn = mem_db();
    let p = attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 35), "gate-1").unwrap();

    let err = attendance::delete_period(&conn, p.id).unwrap_err();
    assert!(matches!(err, AppError::DeleteUnsupported));
}

#[test]
fn test_list_by_day_live_minutes() {
    let conn = mem_db();

    attendance::clock_in(&conn, "w1", DAY, civil(2025, 9, 1, 8, 0), "gate-1").unwrap();
    attendance::clock_in(&conn, "w2", DAY, civil(2025, 9, 1, 9, 0), "gate-1").unwrap();
    attendance::clock_out(&conn, "w1", DAY, civil(2025, 9, 1, 12, 0), "gate-1").unwrap();

    let now = civil(2025, 9, 1, 10, 30);
    let rows = attendance::list_by_day(&conn, DAY).unwrap();
    assert_eq!(rows.len(), 2);

    // Closed period reads its recorded span; open period reads live.
    assert_eq!(rows[0].work_minutes(now), 240);
    assert_eq!(rows[1].work_minutes(now), 90);
}
