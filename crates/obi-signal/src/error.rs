//! Signal error types.

use obi_core::{BookSnapshot, BookState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    /// The snapshot cannot produce a meaningful imbalance.
    #[error(
        "Invalid book state {state} at t={}: bid {} x {}, ask {} x {}",
        .snapshot.timestamp,
        .snapshot.bid_price,
        .snapshot.bid_qty,
        .snapshot.ask_price,
        .snapshot.ask_qty
    )]
    InvalidBookState {
        state: BookState,
        snapshot: BookSnapshot,
    },
}

pub type SignalResult<T> = Result<T, SignalError>;
