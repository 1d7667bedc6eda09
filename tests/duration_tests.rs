mod common;
use common::utc;
use serde_json::json;
use shiftpay::errors::AppError;
use shiftpay::models::{Duration, DurationStyle, HoursDisplay};

#[test]
fn minutes_overflow_is_carried_into_hours() {
    for hours in 0..4 {
        for minutes in [0, 59, 60, 61, 119, 150, 600] {
            let d = Duration::new(hours, minutes).expect("valid duration");
            assert!(d.minutes() < 60, "{hours}:{minutes} left {} minutes", d.minutes());
            assert_eq!(d.total_minutes(), hours * 60 + minutes);
        }
    }

    let d = Duration::new(1, 75).unwrap();
    assert_eq!((d.hours(), d.minutes()), (2, 15));
}

#[test]
fn negative_components_are_rejected() {
    assert!(matches!(Duration::new(-1, 0), Err(AppError::Validation(_))));
    assert!(matches!(Duration::new(0, -5), Err(AppError::Validation(_))));
    assert!(Duration::from_minutes(-1).is_err());
}

#[test]
fn parse_reads_the_wire_form() {
    assert_eq!(Duration::parse("7:30").unwrap(), Duration::new(7, 30).unwrap());
    assert_eq!(Duration::parse(" 1 : 75 ").unwrap(), Duration::new(2, 15).unwrap());
    assert_eq!(Duration::parse("0:0").unwrap(), Duration::ZERO);
    // tokens after the second are ignored
    assert_eq!(Duration::parse("7:30:99").unwrap(), Duration::new(7, 30).unwrap());
    assert_eq!("2:05".parse::<Duration>().unwrap(), Duration::new(2, 5).unwrap());
}

#[test]
fn parse_rejects_malformed_text() {
    for bad in ["", "5", "abc:10", "1:xx", "-1:00", "1.5:00"] {
        assert!(Duration::parse(bad).is_err(), "'{bad}' should not parse");
    }
}

#[test]
fn display_and_parse_agree() {
    for (h, m) in [(0, 0), (0, 45), (7, 5), (12, 59), (100, 1)] {
        let d = Duration::new(h, m).unwrap();
        assert_eq!(Duration::parse(&d.to_string()).unwrap(), d);
    }
    assert_eq!(Duration::new(7, 5).unwrap().to_string(), "7:5");
}

#[test]
fn from_instants_floors_to_whole_minutes() {
    let start = utc("2024-03-01T09:00:00Z");
    let end = utc("2024-03-01T10:30:59Z");
    assert_eq!(Duration::from_instants(&start, &end), Duration::new(1, 30).unwrap());
}

#[test]
fn from_instants_saturates_reversed_interval() {
    let start = utc("2024-03-01T10:00:00Z");
    let end = utc("2024-03-01T09:00:00Z");
    assert_eq!(Duration::from_instants(&start, &end), Duration::ZERO);
}

#[test]
fn format_styles() {
    let d = Duration::new(7, 30).unwrap();
    assert_eq!(d.format(DurationStyle::Narrow, HoursDisplay::Auto), "7h 30m");
    assert_eq!(d.format(DurationStyle::Short, HoursDisplay::Auto), "7 hr, 30 min");
    assert_eq!(d.format(DurationStyle::Long, HoursDisplay::Auto), "7 hours, 30 minutes");
    assert_eq!(d.format(DurationStyle::Digital, HoursDisplay::Auto), "7:30");

    let one = Duration::new(1, 1).unwrap();
    assert_eq!(one.format(DurationStyle::Long, HoursDisplay::Auto), "1 hour, 1 minute");

    assert_eq!(
        Duration::new(2, 0).unwrap().format(DurationStyle::Narrow, HoursDisplay::Auto),
        "2h"
    );
    assert_eq!(
        Duration::new(7, 5).unwrap().format(DurationStyle::Digital, HoursDisplay::Auto),
        "7:05"
    );
}

#[test]
fn format_hour_unit_display() {
    let short = Duration::new(0, 45).unwrap();
    assert_eq!(short.format(DurationStyle::Narrow, HoursDisplay::Auto), "45m");
    assert_eq!(short.format(DurationStyle::Narrow, HoursDisplay::Always), "0h 45m");

    // zero never renders as an empty string
    assert_eq!(Duration::ZERO.format(DurationStyle::Narrow, HoursDisplay::Auto), "0h");
    assert_eq!(Duration::ZERO.format(DurationStyle::Long, HoursDisplay::Auto), "0 hours");
}

#[test]
fn style_from_config_names() {
    assert_eq!(DurationStyle::from_config("Digital"), Some(DurationStyle::Digital));
    assert_eq!(DurationStyle::from_config(" narrow "), Some(DurationStyle::Narrow));
    assert_eq!(DurationStyle::from_config("fancy"), None);
}

#[test]
fn arithmetic() {
    let a = Duration::new(1, 45).unwrap();
    let b = Duration::new(0, 30).unwrap();
    assert_eq!(a + b, Duration::new(2, 15).unwrap());
    assert_eq!(a.checked_sub(b), Some(Duration::new(1, 15).unwrap()));
    assert_eq!(b.checked_sub(a), None);
    assert_eq!(a.checked_sub(a), Some(Duration::ZERO));

    let total: Duration = [a, b, b].iter().sum();
    assert_eq!(total, Duration::new(2, 45).unwrap());
    assert!((total.as_hours_f64() - 2.75).abs() < 1e-9);
}

#[test]
fn serializes_as_text() {
    let d = Duration::new(0, 30).unwrap();
    assert_eq!(serde_json::to_value(d).unwrap(), json!("0:30"));
}

#[test]
fn deserializes_current_and_legacy_shapes() {
    let from_text: Duration = serde_json::from_value(json!("1:30")).unwrap();
    assert_eq!(from_text, Duration::new(1, 30).unwrap());

    let from_parts: Duration = serde_json::from_value(json!({"hours": 1, "minutes": 90})).unwrap();
    assert_eq!(from_parts, Duration::new(2, 30).unwrap());

    let underscored: Duration =
        serde_json::from_value(json!({"_hours": 2, "_minutes": 5})).unwrap();
    assert_eq!(underscored, Duration::new(2, 5).unwrap());

    let minutes_only: Duration = serde_json::from_value(json!({"minutes": 20})).unwrap();
    assert_eq!(minutes_only, Duration::new(0, 20).unwrap());
}

#[test]
fn deserialize_rejects_bad_components() {
    assert!(serde_json::from_value::<Duration>(json!({"hours": 1.5})).is_err());
    assert!(serde_json::from_value::<Duration>(json!({"hours": -1, "minutes": 0})).is_err());
    assert!(serde_json::from_value::<Duration>(json!("nope")).is_err());
    assert!(serde_json::from_value::<Duration>(json!(42)).is_err());
}

#[test]
fn oversized_durations_are_errors_not_panics() {
    let err = Duration::parse("9223372036854775807:60").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(Duration::new(i64::MAX, 60).is_err());
    assert!(Duration::new(i64::from(u32::MAX) + 1, 0).is_err());

    assert!(serde_json::from_value::<Duration>(json!({"hours": 1e300, "minutes": 60})).is_err());
    assert!(serde_json::from_value::<Duration>(json!({"hours": -1e300})).is_err());
    assert!(serde_json::from_value::<Duration>(json!({"hours": 18446744073709551615_u64})).is_err());
}
