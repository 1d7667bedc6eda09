//! Formatting utilities used for CLI outputs.

use crate::models::duration::{Duration, DurationStyle, HoursDisplay};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Plain two-decimal amount; no currency or locale handling.
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Income of a shift, or a marker when its breaks exceed its length.
pub fn income_or_marker(income: Option<f64>) -> String {
    income.map(money).unwrap_or_else(|| "unbillable".to_string())
}

pub fn duration(d: Duration, style: DurationStyle) -> String {
    d.format(style, HoursDisplay::Auto)
}

pub fn breaks(list: &[Duration], style: DurationStyle) -> String {
    if list.is_empty() {
        return "--".to_string();
    }
    list.iter()
        .map(|d| duration(*d, style))
        .collect::<Vec<_>>()
        .join(" + ")
}
