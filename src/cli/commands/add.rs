use super::{audit, open_repository, open_store, parse_breaks, resolve_rate, resolve_workplace};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::raw_shift::RawShift;
use crate::models::template::ShiftTemplates;
use crate::models::work_info::WorkInfos;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::{duration, income_or_marker};
use crate::utils::time::{local_time_of, parse_optional_time, shift_span};
use crate::utils::date;

/// Record a shift, optionally starting from a saved template.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        date,
        workplace,
        rate,
        start,
        end,
        breaks,
        template,
        save_template,
    } = cmd
    {
        //
        // 1. Parse date (mandatory)
        //
        let d = date::parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;

        //
        // 2. Template defaults (optional)
        //
        let mut templates = ShiftTemplates::new(open_store(cfg)?);
        templates.fetch()?;

        let base = match template {
            Some(name) => Some(
                templates
                    .get(name)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(format!("Template '{}' does not exist", name)))?,
            ),
            None => None,
        };

        //
        // 3. Resolve every field: argument > template > config
        //
        let workplace = resolve_workplace(workplace, base.as_ref().map(|t| t.workplace()), cfg)?;
        let pay_rate = resolve_rate(*rate, base.as_ref().map(|t| t.pay_rate()), cfg)?;

        let start_t = parse_optional_time(start.as_ref())?
            .or_else(|| base.as_ref().map(|t| local_time_of(t.start_time())))
            .ok_or_else(|| AppError::InvalidTime("Missing --start (HH:MM)".into()))?;
        let end_t = parse_optional_time(end.as_ref())?
            .or_else(|| base.as_ref().map(|t| local_time_of(t.end_time())))
            .ok_or_else(|| AppError::InvalidTime("Missing --end (HH:MM)".into()))?;

        let unpaid_breaks = if breaks.is_empty() {
            base.as_ref()
                .map(|t| t.unpaid_breaks().to_vec())
                .unwrap_or_default()
        } else {
            parse_breaks(breaks)?
        };

        let (start_time, end_time) = shift_span(d, start_t, end_t)?;

        //
        // 4. Validate and store
        //
        let mut repo = open_repository(cfg)?;
        let shift = repo.add_one(RawShift {
            id: None,
            workplace: Some(workplace.clone()),
            pay_rate: Some(pay_rate),
            start_time: Some(start_time),
            end_time: Some(end_time),
            unpaid_breaks,
        })?;

        //
        // 5. Remember the workplace / rate pair for next time
        //
        let mut infos = WorkInfos::new(open_store(cfg)?);
        infos.fetch()?;
        if let Err(e) = infos.add(&workplace, pay_rate) {
            warning(format!("Could not remember pay rate: {}", e));
        }

        if let Some(name) = save_template {
            templates.add(name, shift.clone())?;
            success(format!("Saved template '{}'.", name.trim()));
        }

        let style = cfg.style();
        success(format!(
            "Added shift {} at {} on {}: {} worked, income {}.",
            shift.id(),
            shift.workplace(),
            d,
            duration(shift.duration(), style),
            income_or_marker(shift.income())
        ));

        audit(
            cfg,
            "add",
            shift.id(),
            &format!("{} {} ({})", d, shift.workplace(), shift.duration()),
        );
    }

    Ok(())
}
