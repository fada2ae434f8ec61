//! Order lifecycle management.
//!
//! Every order the strategy wants to place goes through
//! [`OrderLifecycleManager::submit`]:
//! 1. price and quantity contract checks (violations are errors)
//! 2. risk gate admission (refusals are ordinary outcomes)
//! 3. id assignment and hand-off to the venue as a GTC order
//!
//! The manager also forwards the once-per-tick request to drop order records
//! that can no longer trade.

use obi_core::{BookId, ExecutionVenue, Order, OrderId, OrderSide, OrderType, Price, Size};
use obi_risk::RiskGate;
use obi_telemetry::Metrics;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExecutorError, ExecutorResult};
use crate::ids::{OrderIdSequence, RejectedIdPolicy};

/// Order manager configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderManagerConfig {
    #[serde(default)]
    pub rejected_id_policy: RejectedIdPolicy,
}

/// What happened to a submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Forwarded to the venue.
    Submitted(Order),
    /// Refused by the risk gate and dropped.
    Rejected {
        side: OrderSide,
        price: Price,
        quantity: Size,
        /// Id used up by the refusal, under [`RejectedIdPolicy::Consume`].
        consumed_id: Option<OrderId>,
    },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Submitted(order) => Some(order),
            Self::Rejected { .. } => None,
        }
    }
}

/// Owns the order id sequence for one book and mediates every order entry.
#[derive(Debug)]
pub struct OrderLifecycleManager {
    book: BookId,
    ids: OrderIdSequence,
    gate: RiskGate,
    policy: RejectedIdPolicy,
    submitted: u64,
    rejected: u64,
}

impl OrderLifecycleManager {
    pub fn new(book: BookId, gate: RiskGate, config: &OrderManagerConfig) -> Self {
        Self {
            book,
            ids: OrderIdSequence::new(),
            gate,
            policy: config.rejected_id_policy,
            submitted: 0,
            rejected: 0,
        }
    }

    /// Validate, risk-check and forward one order.
    ///
    /// # Errors
    /// `InvalidPrice` / `InvalidQuantity` for non-positive inputs; the venue
    /// is not touched in that case.
    pub fn submit<V>(
        &mut self,
        venue: &mut V,
        side: OrderSide,
        price: Price,
        quantity: Size,
        order_type: OrderType,
    ) -> ExecutorResult<SubmitOutcome>
    where
        V: ExecutionVenue + ?Sized,
    {
        if !price.is_positive() {
            return Err(ExecutorError::InvalidPrice { side, price });
        }
        if !quantity.is_positive() {
            return Err(ExecutorError::InvalidQuantity { side, quantity });
        }

        if !self.gate.admit(&*venue, quantity) {
            let consumed_id = match self.policy {
                RejectedIdPolicy::Consume => Some(self.ids.issue()?),
                RejectedIdPolicy::Preserve => None,
            };
            self.rejected += 1;
            Metrics::risk_rejected(side.as_str());
            info!(
                side = %side,
                price = %price,
                quantity = %quantity,
                ?consumed_id,
                "Order rejected by risk gate"
            );
            return Ok(SubmitOutcome::Rejected {
                side,
                price,
                quantity,
                consumed_id,
            });
        }

        let id = self.ids.issue()?;
        let order = Order::gtc(id, side, price, quantity, order_type);
        venue.submit_order(self.book, &order);
        self.submitted += 1;
        Metrics::order_submitted(side.as_str());

        info!(
            order_id = id,
            side = %side,
            price = %price,
            quantity = %quantity,
            order_type = %order_type,
            tif = %order.time_in_force,
            "Order submitted"
        );

        Ok(SubmitOutcome::Submitted(order))
    }

    /// Ask the venue to drop order records that can no longer trade.
    pub fn clear_inactive_orders<V>(&self, venue: &mut V)
    where
        V: ExecutionVenue + ?Sized,
    {
        venue.cancel_inactive_orders(self.book);
        Metrics::inactive_cleared();
        debug!(book = self.book, "Cleared inactive orders");
    }

    /// Id the next admitted order will carry.
    pub fn next_order_id(&self) -> OrderId {
        self.ids.peek()
    }

    pub fn submitted_count(&self) -> u64 {
        self.submitted
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn book(&self) -> BookId {
        self.book
    }
}
