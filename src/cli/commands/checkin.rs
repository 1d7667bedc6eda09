use super::{audit, open_repository, open_store, parse_breaks, resolve_rate, resolve_workplace};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::check_in::CheckIn;
use crate::models::raw_shift::RawShift;
use crate::models::work_info::WorkInfos;
use crate::ui::messages::{success, warning};
use crate::utils::date::today;
use crate::utils::formatting::{duration, income_or_marker};
use crate::utils::time::{at_local, hhmm, now_minute, parse_optional_time};

/// `checkin`: remember when the running shift started.
pub fn handle_checkin(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { at } = cmd {
        let mut check_in = CheckIn::new(open_store(cfg)?);
        check_in.fetch()?;

        if let Some(since) = check_in.time() {
            warning(format!("Already checked in since {}.", hhmm(since)));
            return Ok(());
        }

        let at = match parse_optional_time(at.as_ref())? {
            Some(t) => at_local(today(), t)?,
            None => now_minute(),
        };
        let at = check_in.set(Some(at))?;

        success(format!("Checked in at {}.", hhmm(at)));
    }

    Ok(())
}

/// `checkout`: turn the running check-in into a recorded shift.
pub fn handle_checkout(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkout {
        workplace,
        rate,
        breaks,
    } = cmd
    {
        let mut check_in = CheckIn::new(open_store(cfg)?);
        check_in.fetch()?;

        let started = check_in
            .time()
            .ok_or_else(|| AppError::validation("Not checked in: run `checkin` first"))?;

        let workplace = resolve_workplace(workplace, None, cfg)?;
        let pay_rate = resolve_rate(*rate, None, cfg)?;

        let mut repo = open_repository(cfg)?;
        let shift = repo.add_one(RawShift {
            id: None,
            workplace: Some(workplace.clone()),
            pay_rate: Some(pay_rate),
            start_time: Some(started),
            end_time: Some(now_minute()),
            unpaid_breaks: parse_breaks(breaks)?,
        })?;

        check_in.clear()?;

        let mut infos = WorkInfos::new(open_store(cfg)?);
        infos.fetch()?;
        if let Err(e) = infos.add(&workplace, pay_rate) {
            warning(format!("Could not remember pay rate: {}", e));
        }

        success(format!(
            "Checked out: shift {} ({} → {}), {} worked, income {}.",
            shift.id(),
            hhmm(shift.start_time()),
            hhmm(shift.end_time()),
            duration(shift.duration(), cfg.style()),
            income_or_marker(shift.income())
        ));

        audit(cfg, "add", shift.id(), "Recorded from check-in");
    }

    Ok(())
}
