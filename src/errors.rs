//! Unified application error type.
//! Models, the sync engine, the cache and the CLI all return AppError so
//! callers get one consistent failure surface.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("{0}")]
    PartialFailure(String),

    // ---------------------------
    // CLI parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Message without the variant prefix, used when errors are aggregated.
    pub fn detail(&self) -> String {
        match self {
            AppError::Validation(m)
            | AppError::NotFound(m)
            | AppError::Sync(m)
            | AppError::PartialFailure(m)
            | AppError::Storage(m) => m.clone(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
