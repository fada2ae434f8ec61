//! Error types for obi-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid decimal {input:?}: {source}")]
    DecimalParse {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
