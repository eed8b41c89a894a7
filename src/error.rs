use crate::gateway::SourceKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DreError {
    #[error("Invalid period '{0}': expected YYYY-MM with month between 1 and 12")]
    InvalidPeriod(String),

    #[error("Invalid year '{0}': expected a 4-digit year")]
    InvalidYear(String),

    #[error("Source {kind} unavailable: {reason}")]
    SourceUnavailable { kind: SourceKind, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DreError>;
