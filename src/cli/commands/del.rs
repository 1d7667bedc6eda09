use super::{audit, open_repository};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::remote::DeleteTarget;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { ids, all } = cmd {
        let target = match (ids.as_slice(), *all) {
            (_, true) => DeleteTarget::All,
            ([], false) => {
                return Err(AppError::validation(
                    "Nothing to delete: pass one or more shift ids, or --all",
                ));
            }
            ([one], false) => DeleteTarget::One(one.clone()),
            (many, false) => DeleteTarget::Many(many.to_vec()),
        };

        //
        // Confirmation prompt
        //
        let prompt = match &target {
            DeleteTarget::All => "Delete ALL shifts? This action is irreversible.".to_string(),
            DeleteTarget::One(id) => format!("Delete shift {}? This action is irreversible.", id),
            DeleteTarget::Many(list) => format!(
                "Delete {} shifts ({})? This action is irreversible.",
                list.len(),
                list.join(", ")
            ),
        };

        if !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut repo = open_repository(cfg)?;
        let removed = repo.delete(target.clone())?;

        if removed == 0 {
            warning("No matching shifts found.");
            return Ok(());
        }

        success(format!("Deleted {} shift(s).", removed));

        let audit_target = match &target {
            DeleteTarget::All => "all".to_string(),
            DeleteTarget::One(id) => id.clone(),
            DeleteTarget::Many(list) => list.join(","),
        };
        audit(cfg, "del", &audit_target, &format!("{} shift(s) deleted", removed));
    }

    Ok(())
}
