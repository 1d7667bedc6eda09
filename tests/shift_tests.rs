mod common;
use common::utc;
use serde_json::json;
use shiftpay::errors::AppError;
use shiftpay::models::{Duration, Shift, ShiftParams};

fn params(start: &str, end: &str, breaks: &[&str]) -> ShiftParams {
    ShiftParams {
        id: Some("s1".into()),
        workplace: "Cafe".into(),
        pay_rate: 20.0,
        start_time: utc(start),
        end_time: utc(end),
        unpaid_breaks: breaks.iter().map(|b| Duration::parse(b).unwrap()).collect(),
    }
}

fn day_shift() -> Shift {
    Shift::new(params("2024-03-01T09:00:00Z", "2024-03-01T17:00:00Z", &["0:30"])).unwrap()
}

#[test]
fn derived_values_for_a_regular_shift() {
    let s = day_shift();
    assert_eq!(s.duration(), Duration::new(8, 0).unwrap());
    assert_eq!(s.total_break_duration(), Duration::new(0, 30).unwrap());
    assert_eq!(s.billable_duration(), Some(Duration::new(7, 30).unwrap()));
    assert_eq!(s.income(), Some(150.0));
    assert!(s.is_billable());
}

#[test]
fn breaks_longer_than_the_shift_make_it_unbillable() {
    let s = Shift::new(params("2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z", &["1:00", "1:00"]))
        .unwrap();
    assert_eq!(s.billable_duration(), None);
    assert_eq!(s.income(), None);
    assert!(!s.is_billable());
}

#[test]
fn zero_length_shift_is_valid() {
    let s = Shift::new(params("2024-03-01T09:00:00Z", "2024-03-01T09:00:00Z", &[])).unwrap();
    assert!(s.duration().is_zero());
    assert_eq!(s.income(), Some(0.0));
}

#[test]
fn end_before_start_is_rejected() {
    let err = Shift::new(params("2024-03-01T17:00:00Z", "2024-03-01T09:00:00Z", &[])).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn setters_keep_time_order() {
    let mut s = day_shift();

    assert!(s.set_end_time(utc("2024-03-01T08:00:00Z")).is_err());
    assert_eq!(s.end_time(), utc("2024-03-01T17:00:00Z"));

    assert!(s.set_start_time(utc("2024-03-01T18:00:00Z")).is_err());
    assert_eq!(s.start_time(), utc("2024-03-01T09:00:00Z"));

    // moving both ends past the old end is fine as a pair
    s.set_times(utc("2024-03-02T09:00:00Z"), utc("2024-03-02T12:00:00Z"))
        .unwrap();
    assert_eq!(s.duration(), Duration::new(3, 0).unwrap());
    assert!(s.set_times(utc("2024-03-02T12:00:00Z"), utc("2024-03-02T09:00:00Z")).is_err());
}

#[test]
fn pay_rate_must_be_a_non_negative_number() {
    let mut s = day_shift();
    assert!(s.set_pay_rate(-1.0).is_err());
    assert!(s.set_pay_rate(f64::NAN).is_err());
    assert!(s.set_pay_rate(f64::INFINITY).is_err());
    assert_eq!(s.pay_rate(), 20.0);
    s.set_pay_rate(0.0).unwrap();
    assert_eq!(s.income(), Some(0.0));
}

#[test]
fn ids_are_checked_and_generated() {
    let mut s = day_shift();
    assert!(s.set_id("bad id!").is_err());
    assert!(s.set_id("").is_err());
    s.set_id("Shift_2024-03-01").unwrap();
    assert_eq!(s.id(), "Shift_2024-03-01");

    let mut p = params("2024-03-01T09:00:00Z", "2024-03-01T17:00:00Z", &[]);
    p.id = None;
    let a = Shift::new(p.clone()).unwrap();
    let b = Shift::new(p).unwrap();
    assert!(!a.id().is_empty());
    assert_ne!(a.id(), b.id());
    assert!(a.id().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn break_list_is_copied() {
    let mut breaks = vec![Duration::new(0, 15).unwrap()];
    let mut s = day_shift();
    s.set_unpaid_breaks(&breaks);
    breaks.push(Duration::new(1, 0).unwrap());
    assert_eq!(s.unpaid_breaks(), &[Duration::new(0, 15).unwrap()]);
}

#[test]
fn limited_duration_clamps_to_the_window() {
    let s = day_shift();
    assert_eq!(s.limited_duration(None, None), Duration::new(8, 0).unwrap());
    assert_eq!(
        s.limited_duration(Some(utc("2024-03-01T12:00:00Z")), None),
        Duration::new(5, 0).unwrap()
    );
    assert_eq!(
        s.limited_duration(Some(utc("2024-03-01T10:00:00Z")), Some(utc("2024-03-01T11:15:00Z"))),
        Duration::new(1, 15).unwrap()
    );
    // a window missing the shift is zero, never negative
    assert_eq!(
        s.limited_duration(Some(utc("2024-03-02T00:00:00Z")), Some(utc("2024-03-03T00:00:00Z"))),
        Duration::ZERO
    );
    assert_eq!(
        s.limited_duration(Some(utc("2024-03-01T15:00:00Z")), Some(utc("2024-03-01T11:00:00Z"))),
        Duration::ZERO
    );
}

#[test]
fn overlap_is_half_open() {
    let s = day_shift();
    assert!(s.overlaps(utc("2024-03-01T16:59:00Z"), utc("2024-03-01T18:00:00Z")));
    assert!(!s.overlaps(utc("2024-03-01T17:00:00Z"), utc("2024-03-01T18:00:00Z")));
    assert!(!s.overlaps(utc("2024-03-01T08:00:00Z"), utc("2024-03-01T09:00:00Z")));
}

#[test]
fn dto_uses_millisecond_utc_timestamps() {
    let dto = day_shift().to_dto();
    assert_eq!(dto.start_time, "2024-03-01T09:00:00.000Z");
    assert_eq!(dto.end_time, "2024-03-01T17:00:00.000Z");
    assert_eq!(dto.unpaid_breaks, vec!["0:30".to_string()]);

    let v = serde_json::to_value(day_shift()).unwrap();
    assert_eq!(v["payRate"], json!(20.0));
    assert_eq!(v["unpaidBreaks"], json!(["0:30"]));
}

#[test]
fn parse_accepts_the_stored_form() {
    let s = day_shift();
    let back = Shift::parse(&serde_json::to_value(&s).unwrap()).unwrap();
    assert_eq!(back, s);
}

#[test]
fn parse_accepts_legacy_shapes() {
    let legacy = json!({
        "_id": 42,
        "_workplace": "Bar",
        "_payRate": "12.5",
        "from": "2024-03-01T20:00:00Z",
        "to": "2024-03-02T02:00:00Z",
        "_unpaidBreaks": [{"_hours": 0, "_minutes": 30}, "0:15"]
    });
    let s = Shift::parse(&legacy).unwrap();
    assert_eq!(s.id(), "42");
    assert_eq!(s.workplace(), "Bar");
    assert_eq!(s.pay_rate(), 12.5);
    assert_eq!(s.duration(), Duration::new(6, 0).unwrap());
    assert_eq!(s.total_break_duration(), Duration::new(0, 45).unwrap());
}

#[test]
fn parse_accepts_epoch_millis() {
    let v = json!({
        "id": "e1",
        "workplace": "Cafe",
        "payRate": 10,
        "startTime": 1_709_283_600_000_i64,
        "endTime": 1_709_287_200_000_i64
    });
    let s = Shift::parse(&v).unwrap();
    assert_eq!(s.start_time(), utc("2024-03-01T09:00:00Z"));
    assert_eq!(s.duration(), Duration::new(1, 0).unwrap());
    assert!(s.unpaid_breaks().is_empty());
}

#[test]
fn parse_names_missing_fields() {
    let err = Shift::parse(&json!({"id": "x1", "workplace": "Cafe"})).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("x1"), "{msg}");
    assert!(msg.contains("payRate"), "{msg}");
    assert!(msg.contains("startTime"), "{msg}");
    assert!(msg.contains("endTime"), "{msg}");
    assert!(!msg.contains("workplace,"), "{msg}");
}

#[test]
fn parse_rejects_non_objects_and_bad_values() {
    assert!(Shift::parse(&json!(null)).is_err());
    assert!(Shift::parse(&json!("shift")).is_err());

    let mut v = common::shift_json("b1", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z");
    v["startTime"] = json!("yesterday-ish");
    assert!(Shift::parse(&v).is_err());

    let mut v = common::shift_json("b2", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z");
    v["unpaidBreaks"] = json!(["x:y"]);
    assert!(Shift::parse(&v).is_err());

    let v = common::shift_json("b3", "2024-03-01T10:00:00Z", "2024-03-01T09:00:00Z");
    let msg = Shift::parse(&v).unwrap_err().to_string();
    assert!(msg.contains("b3"), "{msg}");
}

#[test]
fn parse_all_keeps_the_good_records() {
    let values = vec![
        common::shift_json("a", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z"),
        json!({"id": "broken"}),
        common::shift_json("c", "2024-03-02T09:00:00Z", "2024-03-02T10:00:00Z"),
    ];
    let outcome = Shift::parse_all(&values);
    assert_eq!(outcome.shifts.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].contains("record #1"));
    assert!(!outcome.complete());
}

#[test]
fn parse_all_drops_records_with_oversized_breaks() {
    let mut huge = common::shift_json("huge", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z");
    huge["unpaidBreaks"] = json!([{"hours": 1e300, "minutes": 60}]);
    let mut overflow = common::shift_json("overflow", "2024-03-01T11:00:00Z", "2024-03-01T12:00:00Z");
    overflow["unpaidBreaks"] = json!(["9223372036854775807:60"]);

    let values = vec![
        huge,
        common::shift_json("fine", "2024-03-02T09:00:00Z", "2024-03-02T10:00:00Z"),
        overflow,
    ];
    let outcome = Shift::parse_all(&values);
    assert_eq!(outcome.shifts.len(), 1);
    assert_eq!(outcome.shifts[0].id(), "fine");
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome.failures[0].contains("huge"));
    assert!(outcome.failures[1].contains("overflow"));
}
