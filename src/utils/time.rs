//! Time utilities: parsing HH:MM and placing times of day on a date.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

/// The instant `time` on local `date`.
pub fn at_local(date: NaiveDate, time: NaiveTime) -> AppResult<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(format!("{time} does not exist on {date}")))
}

/// Start and end instants for a shift worked on `date`. An end at or before
/// the start belongs to the next day (overnight shift).
pub fn shift_span(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_at = at_local(date, start)?;
    let end_date = if end <= start {
        date.checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?
    } else {
        date
    };
    Ok((start_at, at_local(end_date, end)?))
}

/// Local time of day of an instant.
pub fn local_time_of(instant: DateTime<Utc>) -> NaiveTime {
    instant.with_timezone(&Local).time()
}

/// Local date of an instant.
pub fn local_date_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Current instant truncated to the minute.
pub fn now_minute() -> DateTime<Utc> {
    let now = Local::now().with_second(0).and_then(|t| t.with_nanosecond(0));
    now.unwrap_or_else(Local::now).with_timezone(&Utc)
}

/// `HH:MM` of an instant in local time.
pub fn hhmm(instant: DateTime<Utc>) -> String {
    local_time_of(instant).format("%H:%M").to_string()
}
