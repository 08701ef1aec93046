//! Error types for ChatVault.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unsupported page: {0}")]
    UnsupportedPage(String),

    #[error("Export schema violation: {0}")]
    SchemaViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
