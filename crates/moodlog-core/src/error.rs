//! Error types for Moodlog

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store is corrupted: {0}")]
    Parse(String),

    #[error("{0}")]
    Analysis(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backup error: {0}")]
    Backup(String),
}

impl Error {
    /// The error surfaced to callers of the image analyzer
    pub fn analysis_failed() -> Self {
        Error::Analysis("Failed to analyze image".to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
