use super::open_repository;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::{PeriodSummary, summarize};
use crate::errors::{AppError, AppResult};
use crate::models::shift::Shift;
use crate::ui::messages::header;
use crate::utils::date::{self, days_between, local_day_bounds, local_week_bounds};
use crate::utils::formatting::{bold, breaks, duration, income_or_marker, money};
use crate::utils::table::{Column, Table};
use crate::utils::time::{hhmm, local_date_of};
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { day, week, period } = cmd {
        let repo = open_repository(cfg)?;

        let (first, last) = resolve_window(day, week, period)?;
        let (from, _) = local_day_bounds(first).ok_or_else(|| AppError::InvalidDate(first.to_string()))?;
        let (_, to) = local_day_bounds(last).ok_or_else(|| AppError::InvalidDate(last.to_string()))?;

        let mut shifts: Vec<Shift> = repo.range(from, to).into_iter().cloned().collect();
        shifts.sort_by_key(|s| s.start_time());

        if first == last {
            header(first.format("%A %Y-%m-%d"));
        } else {
            header(format!("{} → {}", first, last));
        }

        if shifts.is_empty() {
            println!("No shifts in this period.");
            return Ok(());
        }

        print_table(&shifts, cfg);

        // per-day totals when the window spans several days
        if first != last {
            println!();
            for d in days_between(first, last) {
                if let Some((ds, de)) = local_day_bounds(d) {
                    let s = summarize(&shifts, ds, de);
                    if s.shifts > 0 {
                        println!("{}  {}", d.format("%a %Y-%m-%d"), summary_line(&s, cfg));
                    }
                }
            }
        }

        println!();
        let total = summarize(&shifts, from, to);
        println!("{} {}", bold("Total:"), summary_line(&total, cfg));
    }

    Ok(())
}

fn resolve_window(
    day: &Option<String>,
    week: &Option<String>,
    period: &Option<String>,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let parse = |s: &str| date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()));

    if let Some(w) = week {
        let (start, end) =
            local_week_bounds(parse(w)?).ok_or_else(|| AppError::InvalidDate(w.clone()))?;
        let first = local_date_of(start);
        let last = local_date_of(end)
            .pred_opt()
            .ok_or_else(|| AppError::InvalidDate(w.clone()))?;
        return Ok((first, last));
    }

    if let Some(p) = period {
        let (a, b) = p
            .split_once(':')
            .ok_or_else(|| AppError::InvalidDate(format!("{} (expected FROM:TO)", p)))?;
        let (first, last) = (parse(a)?, parse(b)?);
        if last < first {
            return Err(AppError::InvalidDate(format!("{}: end before start", p)));
        }
        return Ok((first, last));
    }

    let d = match day {
        Some(s) => parse(s)?,
        None => date::today(),
    };
    Ok((d, d))
}

fn print_table(shifts: &[Shift], cfg: &Config) {
    let style = cfg.style();

    let mut table = Table::new(
        vec![
            Column::left("ID", 2),
            Column::left("Workplace", 9),
            Column::left("Date", 10),
            Column::left("Start", 5),
            Column::left("End", 5),
            Column::left("Breaks", 6),
            Column::right("Billable", 8),
            Column::right("Rate", 6),
            Column::right("Income", 6),
        ],
        cfg.separator(),
    );

    for s in shifts {
        table.add_row(vec![
            s.id().to_string(),
            s.workplace().to_string(),
            local_date_of(s.start_time()).to_string(),
            hhmm(s.start_time()),
            hhmm(s.end_time()),
            breaks(s.unpaid_breaks(), style),
            s.billable_duration()
                .map(|d| duration(d, style))
                .unwrap_or_else(|| "--".into()),
            money(s.pay_rate()),
            income_or_marker(s.income()),
        ]);
    }

    print!("{}", table.render());
}

fn summary_line(s: &PeriodSummary, cfg: &Config) -> String {
    let style = cfg.style();
    let mut line = format!(
        "{} shift(s), worked {}, billable {}, income {}",
        s.shifts,
        duration(s.worked, style),
        duration(s.billable, style),
        money(s.income)
    );
    if s.unbillable > 0 {
        line.push_str(&format!(" ({} unbillable)", s.unbillable));
    }
    line
}
