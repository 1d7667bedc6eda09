use super::{audit, open_store};
use crate::cli::parser::{Commands, TemplateAction};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::template::ShiftTemplates;
use crate::ui::messages::{info, notice, success};
use crate::utils::formatting::{breaks, duration, money};
use crate::utils::table::{Column, Table};
use crate::utils::time::hhmm;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Template { action } = cmd {
        let mut templates = ShiftTemplates::new(open_store(cfg)?);
        let failures = templates.fetch()?;
        if !failures.is_empty() {
            notice("Some templates could not be read and were skipped:", &failures);
        }

        match action {
            TemplateAction::List => {
                if templates.is_empty() {
                    info("No templates saved. Use `add ... --save-template NAME` to create one.");
                    return Ok(());
                }

                let style = cfg.style();
                let mut table = Table::new(
                    vec![
                        Column::left("Name", 4),
                        Column::left("Workplace", 9),
                        Column::right("Rate", 6),
                        Column::left("Hours", 11),
                        Column::right("Length", 6),
                        Column::left("Breaks", 6),
                    ],
                    cfg.separator(),
                );
                for (name, t) in templates.iter() {
                    table.add_row(vec![
                        name.to_string(),
                        t.workplace().to_string(),
                        money(t.pay_rate()),
                        format!("{}-{}", hhmm(t.start_time()), hhmm(t.end_time())),
                        duration(t.duration(), style),
                        breaks(t.unpaid_breaks(), style),
                    ]);
                }
                print!("{}", table.render());
            }
            TemplateAction::Show { name } => {
                let t = templates
                    .get(name)
                    .ok_or_else(|| AppError::NotFound(format!("Template '{}' does not exist", name)))?;
                println!("{}", serde_json::to_string_pretty(&t.to_dto())?);
            }
            TemplateAction::Del { name } => {
                if !templates.delete(name)? {
                    return Err(AppError::NotFound(format!("Template '{}' does not exist", name)));
                }
                success(format!("Deleted template '{}'.", name));
                audit(cfg, "del", &format!("template:{}", name), "Template deleted");
            }
        }
    }

    Ok(())
}
