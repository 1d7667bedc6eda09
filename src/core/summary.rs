use crate::models::duration::Duration;
use crate::models::shift::Shift;
use chrono::{DateTime, Utc};

/// Totals for a reporting window such as a day or a (partial) week.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSummary {
    /// Shifts overlapping the window.
    pub shifts: usize,
    /// Time worked inside the window; shifts crossing an edge are clamped.
    pub worked: Duration,
    /// Billable time of the shifts starting inside the window.
    pub billable: Duration,
    /// Income of the shifts starting inside the window.
    pub income: f64,
    /// Shifts starting inside the window whose breaks exceed their length.
    pub unbillable: usize,
}

pub fn summarize(shifts: &[Shift], from: DateTime<Utc>, to: DateTime<Utc>) -> PeriodSummary {
    let mut summary = PeriodSummary::default();

    for shift in shifts.iter().filter(|s| s.overlaps(from, to)) {
        summary.shifts += 1;
        summary.worked = summary.worked + shift.limited_duration(Some(from), Some(to));

        // income is attributed to the window the shift starts in
        if shift.start_time() < from || shift.start_time() >= to {
            continue;
        }
        match (shift.billable_duration(), shift.income()) {
            (Some(billable), Some(income)) => {
                summary.billable = summary.billable + billable;
                summary.income += income;
            }
            _ => summary.unbillable += 1,
        }
    }

    summary
}
