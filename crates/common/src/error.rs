//! Error types for the relief pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReliefError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Reasoning error: {0}")]
    Reasoning(String),

    #[error("Digitization error: {0}")]
    Digitization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReliefError>;
