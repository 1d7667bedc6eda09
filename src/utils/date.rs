use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Utc};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Calendar day of a `YYYY-MM-DD` date or of any instant the shift parser
/// understands (taken in local time).
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    parse_date(s).or_else(|| {
        crate::models::raw_shift::parse_instant(s)
            .ok()
            .map(|dt| dt.with_timezone(&Local).date_naive())
    })
}

/// Local midnight starting `date`, as UTC.
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `[local midnight of date, local midnight of the next day)`.
pub fn local_day_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date.checked_add_days(Days::new(1))?;
    Some((local_midnight(date)?, local_midnight(next)?))
}

/// Monday-to-Monday local week containing `date`.
pub fn local_week_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let monday = date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))?;
    let next_monday = monday.checked_add_days(Days::new(7))?;
    Some((local_midnight(monday)?, local_midnight(next_monday)?))
}

/// Every date from `start` to `end`, both included.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}
