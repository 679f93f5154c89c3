//! Error types

use thiserror::Error;

/// Main error type for Scribe Quest
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid persisted state: {0}")]
    InvalidState(String),

    #[error("State too large: {size} bytes exceeds limit of {limit} bytes")]
    StateTooLarge { size: usize, limit: usize },

    #[error("Unknown formatting action: {0}")]
    UnknownAction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gamification service unavailable")]
    ServiceUnavailable,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
