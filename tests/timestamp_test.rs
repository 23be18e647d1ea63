use tibber_timer::TimerError;
use tibber_timer::timestamp::{HourArithmetic, Timestamp, hours_between};

const MODES: [HourArithmetic; 2] = [HourArithmetic::Calendar, HourArithmetic::FixedWidth];

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

#[test]
fn same_instant_is_zero_hours() {
    for text in [
        "2024-01-01T00:00:00Z",
        "2024-02-29T13:37:59Z",
        "1999-12-31T23:59:59Z",
    ] {
        let t = ts(text);
        for mode in MODES {
            assert_eq!(hours_between(&t, &t, mode), 0);
        }
    }
}

#[test]
fn hours_between_is_antisymmetric() {
    let pairs = [
        ("2024-01-01T10:00:00Z", "2024-01-02T00:00:00Z"),
        ("2024-01-01T10:15:00Z", "2024-01-01T12:14:59Z"),
        ("2024-03-31T00:00:00Z", "2024-04-01T05:00:00Z"),
        ("2024-12-31T22:00:00Z", "2025-01-01T03:30:00Z"),
    ];
    for (a, b) in pairs {
        let (a, b) = (ts(a), ts(b));
        for mode in MODES {
            assert_eq!(hours_between(&a, &b, mode), -hours_between(&b, &a, mode));
        }
    }
}

#[test]
fn modes_agree_within_a_month() {
    let start = ts("2024-06-10T10:00:00Z");
    let end = ts("2024-06-11T23:00:00Z");
    assert_eq!(hours_between(&start, &end, HourArithmetic::Calendar), 37);
    assert_eq!(hours_between(&start, &end, HourArithmetic::FixedWidth), 37);
}

#[test]
fn fixed_width_breaks_after_31_day_month() {
    let start = ts("2024-01-31T23:00:00Z");
    let end = ts("2024-02-01T00:00:00Z");
    assert_eq!(hours_between(&start, &end, HourArithmetic::Calendar), 1);
    assert_eq!(hours_between(&start, &end, HourArithmetic::FixedWidth), -23);
}

#[test]
fn fixed_width_breaks_after_february() {
    let start = ts("2023-02-28T22:00:00Z");
    let end = ts("2023-03-01T01:00:00Z");
    assert_eq!(hours_between(&start, &end, HourArithmetic::Calendar), 3);
    assert_eq!(hours_between(&start, &end, HourArithmetic::FixedWidth), 51);
}

#[test]
fn fixed_width_holds_across_30_day_month_and_year_end() {
    let start = ts("2024-04-30T20:00:00Z");
    let end = ts("2024-05-01T02:00:00Z");
    assert_eq!(hours_between(&start, &end, HourArithmetic::FixedWidth), 6);

    // Dec 31 -> Jan 1: day 31 is worth one day more than the 30-day month
    let start = ts("2024-12-31T20:00:00Z");
    let end = ts("2025-01-01T02:00:00Z");
    assert_eq!(hours_between(&start, &end, HourArithmetic::Calendar), 6);
    assert_eq!(hours_between(&start, &end, HourArithmetic::FixedWidth), -18);
}

#[test]
fn dst_switch_uses_real_elapsed_time() {
    // Europe/Oslo springs forward on 2024-03-31: 01:00+01:00 then 03:00+02:00
    let start = ts("2024-03-31T01:00:00+01:00");
    let end = ts("2024-03-31T03:00:00+02:00");
    assert_eq!(hours_between(&start, &end, HourArithmetic::Calendar), 1);
    assert_eq!(hours_between(&start, &end, HourArithmetic::FixedWidth), 1);
}

#[test]
fn malformed_text_is_an_error_not_zero() {
    for bad in ["", "2024-01-01 10:00", "2024-1-1T1:0:0Z", "2024-02-30T00:00:00Z", "abc"] {
        match Timestamp::parse(bad) {
            Err(TimerError::Timestamp { input, .. }) => assert_eq!(input, bad),
            other => panic!("expected timestamp error for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn ordering_is_chronological() {
    let a = ts("2024-01-01T10:30:00+01:00");
    let b = ts("2024-01-01T10:00:00Z");
    assert!(a < b);
    assert_eq!("2024-01-01T10:30:00+01:00".parse::<Timestamp>().unwrap(), a);
}
