//! Order id sequence.
//!
//! Ids start at 1 and increase by exactly one per issued id. The sequence
//! belongs to a single order manager; nothing else hands out ids.

use obi_core::OrderId;
use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, ExecutorResult};

/// Whether an order refused by the risk gate uses up an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectedIdPolicy {
    /// Rejected orders leave no gap in the admitted id sequence.
    #[default]
    Preserve,
    /// Every attempted order gets an id, admitted or not.
    Consume,
}

/// Monotonic order id counter.
#[derive(Debug, Clone)]
pub struct OrderIdSequence {
    next: OrderId,
}

impl Default for OrderIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderIdSequence {
    pub const FIRST: OrderId = 1;

    #[must_use]
    pub fn new() -> Self {
        Self { next: Self::FIRST }
    }

    /// The id the next call to [`issue`](Self::issue) returns.
    #[must_use]
    pub fn peek(&self) -> OrderId {
        self.next
    }

    /// Hand out the current id and advance.
    pub fn issue(&mut self) -> ExecutorResult<OrderId> {
        let id = self.next;
        self.next = id
            .checked_add(1)
            .ok_or(ExecutorError::IdsExhausted { last: id })?;
        Ok(id)
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next - Self::FIRST
    }
}
