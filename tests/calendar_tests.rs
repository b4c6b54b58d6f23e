mod common;
use common::{civil, tz};

use shiftledger::calendar::{self, WindowLabel};

#[test]
fn test_today_window_is_civil_day() {
    let now = civil(2024, 3, 10, 12, 0);
    let w = calendar::resolve(&WindowLabel::Today, now, tz()).unwrap();
    assert_eq!(w.start, civil(2024, 3, 10, 0, 0));
    assert_eq!(w.end, civil(2024, 3, 11, 0, 0));
}

#[test]
fn test_yesterday_and_day_before() {
    let now = civil(2024, 3, 10, 12, 0);
    let y = calendar::resolve(&WindowLabel::Yesterday, now, tz()).unwrap();
    assert_eq!(y.start, civil(2024, 3, 9, 0, 0));
    assert_eq!(y.end, civil(2024, 3, 10, 0, 0));

    let d2 = calendar::resolve(&WindowLabel::DayBeforeYesterday, now, tz()).unwrap();
    assert_eq!(d2.start, civil(2024, 3, 8, 0, 0));
    assert_eq!(d2.end, civil(2024, 3, 9, 0, 0));

    // DaysAgo(1) must agree with Yesterday
    let ago = calendar::resolve(&WindowLabel::DaysAgo(1), now, tz()).unwrap();
    assert_eq!(ago, y);
}

#[test]
fn test_week_window_boundary() {
    // Rolling 7 civil days ending at today's end.
    let now = civil(2024, 3, 10, 12, 0);
    let w = calendar::resolve(&WindowLabel::Week, now, tz()).unwrap();
    assert_eq!(w.start, civil(2024, 3, 4, 0, 0));
    assert_eq!(w.end, civil(2024, 3, 11, 0, 0));
}

#[test]
fn test_month_window_crosses_year() {
    let now = civil(2025, 1, 15, 9, 0);
    let w = calendar::resolve(
        &WindowLabel::Month {
            year: 2024,
            month: 12,
        },
        now,
        tz(),
    )
    .unwrap();
    assert_eq!(w.start, civil(2024, 12, 1, 0, 0));
    assert_eq!(w.end, civil(2025, 1, 1, 0, 0));
}

#[test]
fn test_invalid_month_rejected() {
    let now = civil(2025, 1, 15, 9, 0);
    assert!(
        calendar::resolve(
            &WindowLabel::Month {
                year: 2025,
                month: 13
            },
            now,
            tz()
        )
        .is_err()
    );
}

#[test]
fn test_day_key_uses_civil_timezone_not_utc() {
    // 00:10 in Tokyo is still the previous day in UTC.
    let instant = civil(2025, 9, 2, 0, 10);
    assert_eq!(calendar::day_key(instant, tz()), "2025-09-02");
    assert_ne!(
        instant.date_naive().format("%Y-%m-%d").to_string(),
        "2025-09-02"
    );
}

#[test]
fn test_windows_are_half_open_and_contiguous() {
    let now = civil(2024, 3, 10, 12, 0);
    let yesterday = calendar::resolve(&WindowLabel::Yesterday, now, tz()).unwrap();
    let today = calendar::resolve(&WindowLabel::Today, now, tz()).unwrap();
    assert_eq!(yesterday.end, today.start);
}

#[test]
fn test_parse_window_labels() {
    assert_eq!(WindowLabel::parse("today").unwrap(), WindowLabel::Today);
    assert_eq!(
        WindowLabel::parse("yesterday").unwrap(),
        WindowLabel::Yesterday
    );
    assert_eq!(
        WindowLabel::parse("day-before").unwrap(),
        WindowLabel::DayBeforeYesterday
    );
    assert_eq!(WindowLabel::parse("week").unwrap(), WindowLabel::Week);
    assert_eq!(WindowLabel::parse("3").unwrap(), WindowLabel::DaysAgo(3));
    assert_eq!(
        WindowLabel::parse("2025-06").unwrap(),
        WindowLabel::Month {
            year: 2025,
            month: 6
        }
    );
    assert!(WindowLabel::parse("fortnight").is_err());
}

#[test]
fn test_resolution_is_deterministic() {
    let now = civil(2024, 3, 10, 12, 0);
    let a = calendar::resolve(&WindowLabel::Week, now, tz()).unwrap();
    let b = calendar::resolve(&WindowLabel::Week, now, tz()).unwrap();
    assert_eq!(a, b);
}
