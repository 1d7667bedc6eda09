//! Loose-shape adapter for shift records.
//!
//! Shift data reaches the engine from the cache, from the remote service and
//! from older releases that stored the fields under different names
//! (`_startTime`, `from`/`to`, numeric ids, object-shaped breaks...).
//! `RawShift::from_value` folds all of those into one typed structure so the
//! validating constructor in [`crate::models::shift`] only ever sees a single
//! shape.

use crate::errors::{AppError, AppResult};
use crate::models::duration::Duration;
use crate::models::shift::Shift;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["id", "_id"];
const WORKPLACE_KEYS: &[&str] = &["workplace", "_workplace"];
const PAY_RATE_KEYS: &[&str] = &["payRate", "_payRate", "pay_rate"];
const START_KEYS: &[&str] = &["startTime", "_startTime", "from", "_from", "start_time"];
const END_KEYS: &[&str] = &["endTime", "_endTime", "to", "_to", "end_time"];
const BREAK_KEYS: &[&str] = &["unpaidBreaks", "_unpaidBreaks", "unpaid_breaks"];

/// A partially-typed shift: every field may still be missing, but whatever
/// is present has already been coerced to its final type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawShift {
    pub id: Option<String>,
    pub workplace: Option<String>,
    pub pay_rate: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub unpaid_breaks: Vec<Duration>,
}

impl RawShift {
    /// Normalize a JSON record of any known historical shape.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        let obj = match value {
            Value::Object(map) => map,
            Value::Null => return Err(AppError::validation("Shift data is undefined")),
            other => {
                return Err(AppError::validation(format!(
                    "Shift data must be an object, got {other}"
                )));
            }
        };

        let id = pick(obj, ID_KEYS).map(coerce_id).transpose()?;
        let label = id.clone().unwrap_or_else(|| "<no id>".to_string());
        let context = |e: AppError| AppError::validation(format!("Shift '{label}': {}", e.detail()));

        let workplace = pick(obj, WORKPLACE_KEYS).map(coerce_text);
        let pay_rate = pick(obj, PAY_RATE_KEYS)
            .map(coerce_rate)
            .transpose()
            .map_err(context)?;
        let start_time = pick(obj, START_KEYS)
            .map(coerce_instant)
            .transpose()
            .map_err(context)?;
        let end_time = pick(obj, END_KEYS)
            .map(coerce_instant)
            .transpose()
            .map_err(context)?;

        let unpaid_breaks = match pick(obj, BREAK_KEYS) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|b| serde_json::from_value::<Duration>(b.clone()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| context(AppError::validation(e.to_string())))?,
            _ => Vec::new(),
        };

        Ok(Self {
            id,
            workplace,
            pay_rate,
            start_time,
            end_time,
            unpaid_breaks,
        })
    }

    /// Human label for error messages.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<no id>")
    }
}

impl From<&Shift> for RawShift {
    fn from(shift: &Shift) -> Self {
        Self {
            id: Some(shift.id().to_string()),
            workplace: Some(shift.workplace().to_string()),
            pay_rate: Some(shift.pay_rate()),
            start_time: Some(shift.start_time()),
            end_time: Some(shift.end_time()),
            unpaid_breaks: shift.unpaid_breaks().to_vec(),
        }
    }
}

impl From<Shift> for RawShift {
    fn from(shift: Shift) -> Self {
        RawShift::from(&shift)
    }
}

/// Identifier of a loose record, if it carries a usable one.
pub(crate) fn record_id(value: &Value) -> Option<String> {
    value
        .as_object()
        .and_then(|obj| pick(obj, ID_KEYS))
        .and_then(|v| coerce_id(v).ok())
}

/// First non-null value among the accepted key spellings.
fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn coerce_id(value: &Value) -> AppResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AppError::validation("ID should be a non-empty string")),
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coerce_rate(value: &Value) -> AppResult<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    rate.ok_or_else(|| AppError::validation("Pay rate should be a number"))
}

/// RFC 3339 strings, naive `YYYY-MM-DDTHH:MM[:SS]` strings read as local
/// time, or epoch milliseconds.
fn coerce_instant(value: &Value) -> AppResult<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| AppError::validation(format!("Invalid date: {n}"))),
        other => Err(AppError::validation(format!("Invalid date: {other}"))),
    }
}

pub(crate) fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt)
            && let Some(local) = Local.from_local_datetime(&naive).earliest()
        {
            return Ok(local.with_timezone(&Utc));
        }
    }

    Err(AppError::validation(format!("Invalid date: {s}")))
}
