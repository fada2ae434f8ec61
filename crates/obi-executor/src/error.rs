//! Executor error types.

use obi_core::{OrderSide, Price, Size};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Caller asked for a non-positive price.
    #[error("Invalid {side} order price: {price} (must be positive)")]
    InvalidPrice { side: OrderSide, price: Price },

    /// Caller asked for a non-positive quantity.
    #[error("Invalid {side} order quantity: {quantity} (must be positive)")]
    InvalidQuantity { side: OrderSide, quantity: Size },

    #[error("Order id space exhausted after {last}")]
    IdsExhausted { last: u64 },
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
