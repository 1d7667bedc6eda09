//! Hours + minutes value type used for shift lengths and unpaid breaks.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, TimeZone};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// A non-negative span of whole minutes, always kept in normalized form
/// (`minutes` in `0..=59`, overflow carried into `hours`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    hours: u32,
    minutes: u32,
}

/// Unit labelling used by [`Duration::format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationStyle {
    /// `7h 30m`
    #[default]
    Narrow,
    /// `7 hr, 30 min`
    Short,
    /// `7 hours, 30 minutes`
    Long,
    /// `7:30`
    Digital,
}

/// Whether the hour unit is printed when it is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoursDisplay {
    #[default]
    Auto,
    Always,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        hours: 0,
        minutes: 0,
    };

    /// Build a normalized duration. `floor(minutes / 60)` is carried into the
    /// hours, the remainder stays in the minutes.
    pub fn new(hours: i64, minutes: i64) -> AppResult<Self> {
        if hours < 0 {
            return Err(AppError::validation("Hours cannot be negative"));
        }
        if minutes < 0 {
            return Err(AppError::validation("Minutes cannot be negative"));
        }

        let too_large = || AppError::validation("Duration is too large");
        let total_hours = hours.checked_add(minutes / 60).ok_or_else(too_large)?;
        let hours = u32::try_from(total_hours).map_err(|_| too_large())?;

        Ok(Self {
            hours,
            minutes: (minutes % 60) as u32,
        })
    }

    pub fn from_minutes(minutes: i64) -> AppResult<Self> {
        Self::new(0, minutes)
    }

    /// Whole minutes (floored) elapsed between two instants.
    /// A reversed interval saturates to zero; ordering is a Shift concern.
    pub fn from_instants<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self {
        let minutes = end.clone().signed_duration_since(start.clone()).num_minutes();
        Self::saturating(minutes.max(0) as u64)
    }

    /// Parse the `"H:M"` wire form. Tokens after the second are ignored.
    pub fn parse(text: &str) -> AppResult<Self> {
        let mut parts = text.split(':').map(str::trim);

        let invalid = || {
            AppError::validation(format!(
                "Invalid duration '{text}': hours and minutes must be numbers"
            ))
        };

        let hours = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let minutes = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(invalid)?;

        Self::new(hours, minutes)
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> i64 {
        self.hours as i64 * 60 + self.minutes as i64
    }

    pub fn as_hours_f64(&self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }

    /// `None` when `other` is longer than `self`.
    pub fn checked_sub(self, other: Duration) -> Option<Duration> {
        let diff = self.total_minutes() - other.total_minutes();
        if diff < 0 {
            return None;
        }
        Some(Self::saturating(diff as u64))
    }

    /// Human readable rendering. A zero duration always shows the hour unit
    /// so the result is never empty.
    pub fn format(&self, style: DurationStyle, hours_display: HoursDisplay) -> String {
        let hours_display = if self.is_zero() {
            HoursDisplay::Always
        } else {
            hours_display
        };

        if style == DurationStyle::Digital {
            return format!("{}:{:02}", self.hours, self.minutes);
        }

        let mut parts = Vec::with_capacity(2);
        if self.hours > 0 || hours_display == HoursDisplay::Always {
            parts.push(unit(style, self.hours, ("h", "hr", "hour")));
        }
        if self.minutes > 0 {
            parts.push(unit(style, self.minutes, ("m", "min", "minute")));
        }

        match style {
            DurationStyle::Narrow => parts.join(" "),
            _ => parts.join(", "),
        }
    }

    fn saturating(total_minutes: u64) -> Self {
        Self {
            hours: u32::try_from(total_minutes / 60).unwrap_or(u32::MAX),
            minutes: (total_minutes % 60) as u32,
        }
    }
}

fn unit(style: DurationStyle, value: u32, labels: (&str, &str, &str)) -> String {
    let (narrow, short, long) = labels;
    match style {
        DurationStyle::Narrow => format!("{value}{narrow}"),
        DurationStyle::Short => format!("{value} {short}"),
        DurationStyle::Long if value == 1 => format!("{value} {long}"),
        DurationStyle::Long => format!("{value} {long}s"),
        DurationStyle::Digital => value.to_string(),
    }
}

impl DurationStyle {
    pub fn from_config(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "narrow" => Some(Self::Narrow),
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            "digital" => Some(Self::Digital),
            _ => None,
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hours, self.minutes)
    }
}

impl FromStr for Duration {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Duration::parse(s)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::saturating((self.total_minutes() + rhs.total_minutes()) as u64)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Duration> for Duration {
    fn sum<I: Iterator<Item = &'a Duration>>(iter: I) -> Duration {
        iter.copied().sum()
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Shapes a stored break may come in: the `"H:M"` string, or an object with
/// (possibly underscored) hour/minute fields written by older versions.
#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Text(String),
    Parts {
        #[serde(default, alias = "_hours")]
        hours: Option<Value>,
        #[serde(default, alias = "_minutes")]
        minutes: Option<Value>,
    },
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match DurationRepr::deserialize(deserializer)? {
            DurationRepr::Text(s) => Duration::parse(&s),
            DurationRepr::Parts { hours, minutes } => {
                integer_component(hours.as_ref(), "Hours").and_then(|h| {
                    integer_component(minutes.as_ref(), "Minutes").and_then(|m| Duration::new(h, m))
                })
            }
        };
        parsed.map_err(|e| de::Error::custom(e.detail()))
    }
}

fn integer_component(value: Option<&Value>, name: &str) -> AppResult<i64> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(AppError::validation(format!("{name} should be an integer"))),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::validation(format!("{name} should be an integer"))),
        Some(_) => Err(AppError::validation(format!("{name} should be an integer"))),
    }
}
