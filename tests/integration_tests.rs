mod common;
use common::{setup_test_db, sl};

use predicates::prelude::*;

#[test]
fn test_init_creates_database() {
    let db = setup_test_db("init");

    sl().args(["--test", "--db", &db, "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));

    assert!(std::path::Path::new(&db).exists());
    std::fs::remove_file(&db).ok();
}

#[test]
fn test_clock_in_status_clock_out_flow() {
    let db = setup_test_db("attendance_flow");

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 08:35", "clock-in", "w1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("w1 clocked in on 2025-09-01"));

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 12:35", "status", "w1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("04h 00m so far"));

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 17:00", "clock-out", "w1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08h 25m worked"));

    // Clocking out twice reports the closed period.
    sl().args(["--test", "--db", &db, "--at", "2025-09-01 17:05", "clock-out", "w1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already closed"));

    std::fs::remove_file(&db).ok();
}

#[test]
fn test_session_flow_and_conflict() {
    let db = setup_test_db("session_flow");

    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 09:00",
        "start", "w1", "veh-7", "paint", "--desc", "door panels",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Session 1 started for w1 on veh-7/paint"));

    // Same worker, second start: conflict, never an implicit close.
    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 09:30",
        "start", "w1", "veh-8", "weld",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
        "Worker w1 already has an open work session",
    ));

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 10:00", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 w1 veh-7/paint"))
        .stdout(predicate::str::contains("(01:00)"));

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 10:30", "stop", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session 1 stopped (01h 30m)"));

    sl().args(["--test", "--db", &db, "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open sessions."));

    std::fs::remove_file(&db).ok();
}

#[test]
fn test_sweep_one_shot_closes_forgotten_period() {
    let db = setup_test_db("sweep_cli");

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 08:35", "clock-in", "w1"])
        .assert()
        .success();

    // Before the cutoff the sweep is a no-op.
    sl().args(["--test", "--db", &db, "--at", "2025-09-01 17:00", "sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 23:59", "sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sweep: 1 closed"));

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 23:59", "status", "w1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[auto-closed]"))
        .stdout(predicate::str::contains("15h 24m worked"));

    std::fs::remove_file(&db).ok();
}

#[test]
fn test_report_table_and_json() {
    let db = setup_test_db("report_cli");

    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 09:00",
        "start", "w1", "veh-7", "paint",
    ])
    .assert()
    .success();
    sl().args(["--test", "--db", &db, "--at", "2025-09-01 10:30", "stop", "1"])
        .assert()
        .success();

    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 12:00",
        "report", "-w", "today",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("=== today (by vehicle) ==="))
    .stdout(predicate::str::contains("veh-7"))
    .stdout(predicate::str::contains("01h 30m (1 session(s)"));

    let out = sl()
        .args([
            "--test", "--db", &db, "--at", "2025-09-01 12:00",
            "report", "-w", "today", "-w", "week", "--json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["windows"]["today"][0]["group_key"], "veh-7");
    assert_eq!(report["windows"]["today"][0]["total_minutes"], 90);
    assert_eq!(report["windows"]["week"][0]["total_minutes"], 90);

    // Unknown window spec is rejected up front.
    sl().args(["--test", "--db", &db, "report", "-w", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid report window"));

    std::fs::remove_file(&db).ok();
}

#[test]
fn test_day_listing_warns_on_implausible_open_session() {
    let db = setup_test_db("day_warning");

    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 09:00",
        "start", "w1", "veh-7", "paint",
    ])
    .assert()
    .success();

    // 21 hours later the listing still shows the clamped live duration,
    // plus a data-quality warning for the long-open session.
    sl().args(["--test", "--db", &db, "--at", "2025-09-02 06:00", "day", "2025-09-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 w1 veh-7/paint"))
        .stdout(predicate::str::contains(
            "session 1 has been open for 1260 minutes",
        ));

    std::fs::remove_file(&db).ok();
}

#[test]
fn test_admin_set_and_audit_flow() {
    let db = setup_test_db("admin_cli");

    sl().args(["--test", "--db", &db, "--at", "2025-09-01 08:35", "clock-in", "w1"])
        .assert()
        .success();
    sl().args(["--test", "--db", &db, "--at", "2025-09-01 17:00", "clock-out", "w1"])
        .assert()
        .success();

    sl().args([
        "--test", "--db", &db, "--at", "2025-09-02 09:00",
        "admin-set", "1", "--out", "2025-09-01 18:00", "--editor", "admin-1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Period 1 updated"))
    .stdout(predicate::str::contains("2025-09-01 18:00"));

    sl().args(["--test", "--db", &db, "audit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AUDIT TRAIL for period 1"))
        .stdout(predicate::str::contains("admin-1 clock_out"));

    // Attendance periods are never deletable.
    sl().args(["--test", "--db", &db, "del", "--period", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Attendance periods cannot be deleted",
        ));

    std::fs::remove_file(&db).ok();
}

#[test]
fn test_del_session_soft_delete() {
    let db = setup_test_db("del_cli");

    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 09:00",
        "start", "w1", "veh-7", "paint",
    ])
    .assert()
    .success();

    sl().args(["--test", "--db", &db, "del", "--session", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session 1 soft-deleted"));

    // The deleted open session no longer blocks the worker.
    sl().args([
        "--test", "--db", &db, "--at", "2025-09-01 09:30",
        "start", "w1", "veh-8", "weld",
    ])
    .assert()
    .success();

    std::fs::remove_file(&db).ok();
}
