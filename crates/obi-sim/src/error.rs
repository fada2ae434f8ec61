//! Simulation error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid tick data at line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
