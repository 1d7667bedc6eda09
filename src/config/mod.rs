use crate::errors::{AppError, AppResult};
use crate::models::duration::DurationStyle;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub default_workplace: Option<String>,
    #[serde(default)]
    pub default_pay_rate: Option<f64>,
    #[serde(default = "default_duration_style")]
    pub duration_style: String,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_duration_style() -> String {
    "narrow".to_string()
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_workplace: None,
            default_pay_rate: None,
            duration_style: default_duration_style(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("shiftpay")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".shiftpay")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("shiftpay.conf")
    }

    /// Return the default path of the SQLite cache
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("shiftpay.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    /// Write the configuration file, creating its directory if needed.
    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self)?;
        fs::write(Self::config_file(), yaml)?;
        Ok(())
    }

    /// Cache path with `~` expanded.
    pub fn database_path(&self) -> String {
        expand_tilde(&self.database).to_string_lossy().to_string()
    }

    pub fn style(&self) -> DurationStyle {
        DurationStyle::from_config(&self.duration_style).unwrap_or_default()
    }

    pub fn separator(&self) -> char {
        self.separator_char.chars().next().unwrap_or('-')
    }

    /// Fields that do not hold a usable value.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if DurationStyle::from_config(&self.duration_style).is_none() {
            out.push(format!(
                "duration_style '{}' is not one of narrow, short, long, digital",
                self.duration_style
            ));
        }
        if let Some(rate) = self.default_pay_rate
            && (!rate.is_finite() || rate < 0.0)
        {
            out.push(format!("default_pay_rate {} must be a non-negative number", rate));
        }
        if self.separator_char.chars().count() != 1 {
            out.push("separator_char must be a single character".to_string());
        }
        out
    }
}
