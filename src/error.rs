use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No {kind} file found under {root} in the {lookback_hours} hours before {reference}")]
    RunNotFound {
        kind: &'static str,
        root: String,
        reference: DateTime<Utc>,
        lookback_hours: i64,
    },

    #[error("Parse error in {path}, line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Wind and atmosphere series do not align: {0}")]
    SeriesMismatch(String),

    #[error("Record validation error: {message}")]
    RecordValidation { message: String },

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid reference time '{0}': expected RFC 3339 or 'YYYY-MM-DD HH:MM'")]
    InvalidReference(String),
}
