use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ansi pattern"));

fn visible_len(s: &str) -> usize {
    ANSI.replace_all(s, "").chars().count()
}

/// ANSI colour per operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "edit" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let store = open_store(cfg)?;
        let entries = load_log(store.conn())?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(i64, String, String, String)> = entries
            .into_iter()
            .map(|(id, date, op, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(date);
                let mut label = color_for_operation(&op).paint(op.as_str()).to_string();
                if !target.is_empty() {
                    label.push_str(&format!(" ({})", target));
                }
                (id, date, label, message)
            })
            .collect();

        let id_w = rows.iter().map(|r| r.0.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);
        let op_w = rows.iter().map(|r| visible_len(&r.2)).max().unwrap_or(10).min(60);

        println!("📜 Internal log:\n");
        for (id, date, label, message) in rows {
            let padding = " ".repeat(op_w.saturating_sub(visible_len(&label)));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                label,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }
    }

    Ok(())
}
