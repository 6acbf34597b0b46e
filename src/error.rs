//! Error types for currensee

use thiserror::Error;

/// Main error type for currensee
#[derive(Error, Debug)]
pub enum CurrenseeError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for currensee operations
pub type Result<T> = std::result::Result<T, CurrenseeError>;
