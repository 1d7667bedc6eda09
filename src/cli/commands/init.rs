use super::audit;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::kv::SqliteStore;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::fs;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite cache with its tables
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    println!("⚙️  Initializing shiftpay…");

    if !cli.test {
        cfg.save()?;
        println!("📄 Config file : {}", Config::config_file().display());
    }

    let db_path = cfg.database_path();
    if let Some(parent) = Path::new(&db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    // opening runs the schema migrations
    SqliteStore::open(&db_path)?;
    println!("🗄️  Cache       : {}", db_path);

    audit(cfg, "init", "cache", &format!("Cache initialized at {}", db_path));

    success("shiftpay initialization completed!");
    Ok(())
}
