use super::{audit, open_repository, parse_breaks};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::raw_shift::RawShift;
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::formatting::{duration, income_or_marker};
use crate::utils::time::{local_date_of, local_time_of, parse_optional_time, shift_span};

/// Change fields of an existing shift; anything not given is kept.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Update {
        id,
        workplace,
        rate,
        date: new_date,
        start,
        end,
        breaks,
        clear_breaks,
    } = cmd
    {
        let mut repo = open_repository(cfg)?;

        let existing = repo
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Cannot update shift: ID '{}' not found", id)))?;
        let mut raw = RawShift::from(existing);

        if let Some(w) = workplace {
            raw.workplace = Some(w.clone());
        }
        if let Some(r) = rate {
            raw.pay_rate = Some(*r);
        }

        let start_arg = parse_optional_time(start.as_ref())?;
        let end_arg = parse_optional_time(end.as_ref())?;

        if new_date.is_some() || start_arg.is_some() || end_arg.is_some() {
            let d = match new_date {
                Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
                None => local_date_of(existing.start_time()),
            };
            let s = start_arg.unwrap_or_else(|| local_time_of(existing.start_time()));
            let e = end_arg.unwrap_or_else(|| local_time_of(existing.end_time()));

            let (start_time, end_time) = shift_span(d, s, e)?;
            raw.start_time = Some(start_time);
            raw.end_time = Some(end_time);
        }

        if *clear_breaks {
            raw.unpaid_breaks.clear();
        } else if !breaks.is_empty() {
            raw.unpaid_breaks = parse_breaks(breaks)?;
        }

        let shift = repo.update(id, raw)?;

        success(format!(
            "Updated shift {}: {} worked, income {}.",
            shift.id(),
            duration(shift.duration(), cfg.style()),
            income_or_marker(shift.income())
        ));

        audit(cfg, "edit", shift.id(), &format!("{} updated", shift.id()));
    }

    Ok(())
}
