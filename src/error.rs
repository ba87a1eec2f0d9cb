//! Simulator error types

use std::io;
use thiserror::Error;

/// Result type for simulator operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while setting up or running the channel simulation
#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid or inconsistent configuration, raised before any sample is produced
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Chip table or configuration file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Report WAV could not be written
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl SimError {
    pub fn config(msg: impl Into<String>) -> Self {
        SimError::Config(msg.into())
    }
}
