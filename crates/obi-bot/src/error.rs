//! Application error types.

use obi_core::Timestamp;
use thiserror::Error;

/// Invariant violation that stops a run mid-tick.
#[derive(Debug, Error)]
pub enum TickFailure {
    #[error(transparent)]
    Signal(#[from] obi_signal::SignalError),

    #[error(transparent)]
    Order(#[from] obi_executor::ExecutorError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Run aborted at tick {tick} (t={timestamp}): {source}")]
    Tick {
        tick: u64,
        timestamp: Timestamp,
        #[source]
        source: TickFailure,
    },

    #[error("Simulation error: {0}")]
    Sim(#[from] obi_sim::SimError),

    #[error("Risk error: {0}")]
    Risk(#[from] obi_risk::RiskError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] obi_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
