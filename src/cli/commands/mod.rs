pub mod add;
pub mod checkin;
pub mod config;
pub mod del;
pub mod init;
pub mod list;
pub mod log;
pub mod template;
pub mod update;
pub mod workinfo;

use crate::config::Config;
use crate::core::repository::ShiftRepository;
use crate::db::kv::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::models::duration::Duration;
use crate::ui::messages::{notice, warning};

/// Open the cache and load the shift mirror from it.
/// Records that fail to parse are reported, not fatal.
pub(crate) fn open_repository(cfg: &Config) -> AppResult<ShiftRepository<SqliteStore>> {
    let store = SqliteStore::open(&cfg.database_path())?;
    let mut repo = ShiftRepository::new(store);

    let report = repo.fetch()?;
    if !report.is_complete() {
        notice(
            format!(
                "{} stored shift(s) could not be read and were skipped:",
                report.failures.len()
            ),
            &report.failures,
        );
    }

    Ok(repo)
}

pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    SqliteStore::open(&cfg.database_path())
}

/// Internal log line; a failure here never fails the command.
pub(crate) fn audit(cfg: &Config, operation: &str, target: &str, message: &str) {
    let written = open_store(cfg)
        .and_then(|store| crate::db::log::ttlog(store.conn(), operation, target, message));
    if let Err(e) = written {
        warning(format!("Failed to write internal log: {}", e));
    }
}

pub(crate) fn parse_breaks(raw: &[String]) -> AppResult<Vec<Duration>> {
    raw.iter().map(|b| Duration::parse(b)).collect()
}

pub(crate) fn resolve_workplace(arg: &Option<String>, fallback: Option<&str>, cfg: &Config) -> AppResult<String> {
    arg.clone()
        .or_else(|| fallback.map(str::to_string))
        .or_else(|| cfg.default_workplace.clone())
        .ok_or_else(|| {
            AppError::validation("Missing workplace: pass --workplace or set default_workplace")
        })
}

pub(crate) fn resolve_rate(arg: Option<f64>, fallback: Option<f64>, cfg: &Config) -> AppResult<f64> {
    arg.or(fallback)
        .or(cfg.default_pay_rate)
        .ok_or_else(|| AppError::validation("Missing pay rate: pass --rate or set default_pay_rate"))
}
