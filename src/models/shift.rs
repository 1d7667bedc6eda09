use super::duration::Duration;
use super::raw_shift::RawShift;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid id pattern"));

/// Typed constructor input. A missing `id` is generated.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftParams {
    pub id: Option<String>,
    pub workplace: String,
    pub pay_rate: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub unpaid_breaks: Vec<Duration>,
}

/// A worked shift. Fields are private so that every write goes through the
/// validating setters; `end_time >= start_time` holds for every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    id: String,
    workplace: String,
    pay_rate: f64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    unpaid_breaks: Vec<Duration>,
}

/// Wire / storage form of a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDto {
    pub id: String,
    pub workplace: String,
    pub pay_rate: f64,
    pub start_time: String,
    pub end_time: String,
    pub unpaid_breaks: Vec<String>,
}

/// Result of tolerant batch parsing.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub shifts: Vec<Shift>,
    /// One message per dropped record.
    pub failures: Vec<String>,
}

impl ParseOutcome {
    pub fn complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Shift {
    pub fn new(params: ShiftParams) -> AppResult<Self> {
        let ShiftParams {
            id,
            workplace,
            pay_rate,
            start_time,
            end_time,
            unpaid_breaks,
        } = params;

        let mut shift = Shift {
            id: String::new(),
            workplace: String::new(),
            pay_rate: 0.0,
            start_time,
            end_time: start_time,
            unpaid_breaks: Vec::new(),
        };

        shift.set_id(id.unwrap_or_else(|| Uuid::new_v4().to_string()))?;
        shift.set_workplace(workplace);
        shift.set_pay_rate(pay_rate)?;
        shift.set_end_time(end_time)?;
        shift.set_unpaid_breaks(&unpaid_breaks);

        Ok(shift)
    }

    /// Validate a normalized raw record. Workplace, pay rate and both
    /// instants are required; the id is generated when absent.
    pub fn from_raw(raw: RawShift) -> AppResult<Self> {
        let mut missing = Vec::new();
        if raw.workplace.is_none() {
            missing.push("workplace");
        }
        if raw.pay_rate.is_none() {
            missing.push("payRate");
        }
        if raw.start_time.is_none() {
            missing.push("startTime");
        }
        if raw.end_time.is_none() {
            missing.push("endTime");
        }

        let label = raw.label().to_string();
        match (raw.workplace, raw.pay_rate, raw.start_time, raw.end_time) {
            (Some(workplace), Some(pay_rate), Some(start_time), Some(end_time)) => {
                Shift::new(ShiftParams {
                    id: raw.id,
                    workplace,
                    pay_rate,
                    start_time,
                    end_time,
                    unpaid_breaks: raw.unpaid_breaks,
                })
                .map_err(|e| AppError::validation(format!("Shift '{label}': {}", e.detail())))
            }
            _ => Err(AppError::validation(format!(
                "Shift '{label}': missing required fields ({})",
                missing.join(", ")
            ))),
        }
    }

    /// Tolerant constructor for records of any known historical shape.
    pub fn parse(value: &Value) -> AppResult<Self> {
        RawShift::from_value(value).and_then(Shift::from_raw)
    }

    /// Parse every record, keeping the good ones and recording the rest.
    pub fn parse_all(values: &[Value]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for (index, value) in values.iter().enumerate() {
            match Shift::parse(value) {
                Ok(shift) => outcome.shifts.push(shift),
                Err(e) => {
                    tracing::warn!(index, error = %e, "dropping unparseable shift record");
                    outcome.failures.push(format!("record #{index}: {}", e.detail()));
                }
            }
        }

        outcome
    }

    // ---------------------------
    // Accessors
    // ---------------------------
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn workplace(&self) -> &str {
        &self.workplace
    }

    pub fn pay_rate(&self) -> f64 {
        self.pay_rate
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn unpaid_breaks(&self) -> &[Duration] {
        &self.unpaid_breaks
    }

    // ---------------------------
    // Validated setters
    // ---------------------------
    pub fn set_id(&mut self, id: impl Into<String>) -> AppResult<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::validation("ID should be a non-empty string"));
        }
        if !ID_PATTERN.is_match(&id) {
            return Err(AppError::validation(
                "ID can only contain alphanumeric characters, underscores, and hyphens",
            ));
        }
        self.id = id;
        Ok(())
    }

    pub fn set_workplace(&mut self, workplace: impl Into<String>) {
        self.workplace = workplace.into();
    }

    pub fn set_pay_rate(&mut self, pay_rate: f64) -> AppResult<()> {
        if !pay_rate.is_finite() {
            return Err(AppError::validation("Pay rate should be a number"));
        }
        if pay_rate < 0.0 {
            return Err(AppError::validation("Pay rate cannot be negative"));
        }
        self.pay_rate = pay_rate;
        Ok(())
    }

    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) -> AppResult<()> {
        if start_time > self.end_time {
            return Err(AppError::validation(
                "Start date cannot be after the end date",
            ));
        }
        self.start_time = start_time;
        Ok(())
    }

    pub fn set_end_time(&mut self, end_time: DateTime<Utc>) -> AppResult<()> {
        if self.start_time > end_time {
            return Err(AppError::validation(
                "End date cannot be before the start date",
            ));
        }
        self.end_time = end_time;
        Ok(())
    }

    /// Move both ends at once; the pair is checked before anything changes.
    pub fn set_times(&mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> AppResult<()> {
        if start_time > end_time {
            return Err(AppError::validation(
                "End date cannot be before the start date",
            ));
        }
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    /// Stores a copy; later changes to the caller's slice are not observed.
    pub fn set_unpaid_breaks(&mut self, unpaid_breaks: &[Duration]) {
        self.unpaid_breaks = unpaid_breaks.to_vec();
    }

    // ---------------------------
    // Derived values
    // ---------------------------
    pub fn duration(&self) -> Duration {
        Duration::from_instants(&self.start_time, &self.end_time)
    }

    pub fn total_break_duration(&self) -> Duration {
        self.unpaid_breaks.iter().sum()
    }

    /// Worked time minus unpaid breaks; `None` when the breaks exceed the
    /// worked time.
    pub fn billable_duration(&self) -> Option<Duration> {
        self.duration().checked_sub(self.total_break_duration())
    }

    pub fn income(&self) -> Option<f64> {
        self.billable_duration()
            .map(|billable| self.pay_rate * billable.as_hours_f64())
    }

    pub fn is_billable(&self) -> bool {
        self.billable_duration().is_some()
    }

    /// Duration of the part of this shift that falls inside the optional
    /// window. Never negative, even when the window misses the shift.
    pub fn limited_duration(
        &self,
        from_limit: Option<DateTime<Utc>>,
        to_limit: Option<DateTime<Utc>>,
    ) -> Duration {
        let from = from_limit.map_or(self.start_time, |limit| limit.max(self.start_time));
        let to = to_limit.map_or(self.end_time, |limit| limit.min(self.end_time));
        Duration::from_instants(&from, &to)
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    pub fn to_dto(&self) -> ShiftDto {
        ShiftDto {
            id: self.id.clone(),
            workplace: self.workplace.clone(),
            pay_rate: self.pay_rate,
            start_time: self.start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            end_time: self.end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            unpaid_breaks: self.unpaid_breaks.iter().map(Duration::to_string).collect(),
        }
    }
}

impl Serialize for Shift {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dto().serialize(serializer)
    }
}
