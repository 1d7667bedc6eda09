use super::open_store;
use crate::cli::parser::{Commands, WorkInfoAction};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::work_info::WorkInfos;
use crate::ui::messages::{info, success};
use crate::utils::formatting::{bold, money};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Workinfo { action } = cmd {
        let mut infos = WorkInfos::new(open_store(cfg)?);
        infos.fetch()?;

        match action {
            WorkInfoAction::List => {
                let workplaces: Vec<String> = infos.workplaces().map(str::to_string).collect();
                if workplaces.is_empty() {
                    info("No workplaces remembered yet.");
                    return Ok(());
                }
                for w in workplaces {
                    let rates: Vec<String> = infos.rates(&w).into_iter().map(money).collect();
                    println!("{}: {}", bold(&w), rates.join(", "));
                }
            }
            WorkInfoAction::Add { workplace, rate } => {
                infos.add(workplace, *rate)?;
                success(format!("Remembered {} for {}.", money(*rate), workplace.trim()));
            }
            WorkInfoAction::Del { workplace, rate } => {
                infos.delete(workplace, *rate)?;
                match rate {
                    Some(r) => success(format!("Forgot {} for {}.", money(*r), workplace)),
                    None => success(format!("Forgot workplace {}.", workplace)),
                }
            }
        }
    }

    Ok(())
}
