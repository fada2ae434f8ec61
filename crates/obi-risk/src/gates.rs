//! Order admission gates.
//!
//! # Gate Evaluation Order
//! 1. max_order_size - requested quantity, no venue access
//! 2. max_position - signed net position read from the venue
//!
//! The balance state is fetched and logged alongside the position but does
//! not take part in the decision.

use obi_core::{BookId, ExecutionVenue, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{RiskError, RiskResult};

/// Admission thresholds.
///
/// Both limits default to the same value; they are configured independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Largest quantity a single order may carry.
    #[serde(default = "default_max_order_size")]
    pub max_order_size: Size,
    /// New orders are refused while the net position is above this.
    #[serde(default = "default_max_position_size")]
    pub max_position_size: Size,
}

fn default_max_order_size() -> Size {
    Size::new(Decimal::from(1000))
}

fn default_max_position_size() -> Size {
    Size::new(Decimal::from(1000))
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_order_size: default_max_order_size(),
            max_position_size: default_max_position_size(),
        }
    }
}

impl RiskLimits {
    /// Validate the limits.
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_order_size.is_positive() {
            return Err(format!(
                "max_order_size ({}) must be positive",
                self.max_order_size
            ));
        }
        if !self.max_position_size.is_positive() {
            return Err(format!(
                "max_position_size ({}) must be positive",
                self.max_position_size
            ));
        }
        Ok(())
    }
}

/// Result of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// Gate passed.
    Pass,
    /// Gate blocked.
    Block { gate: &'static str, reason: String },
}

impl GateResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }
}

/// Stateless order admission check for one book.
#[derive(Debug, Clone)]
pub struct RiskGate {
    limits: RiskLimits,
    book: BookId,
}

impl RiskGate {
    /// Create a gate for `book`, rejecting non-positive limits.
    pub fn new(limits: RiskLimits, book: BookId) -> RiskResult<Self> {
        limits.validate().map_err(RiskError::ConfigError)?;
        Ok(Self { limits, book })
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Run every gate for an order of `quantity`.
    ///
    /// Returns the first blocking gate. The position comparison is signed, so
    /// a short position never trips the ceiling.
    pub fn check<V>(&self, venue: &V, quantity: Size) -> GateResult
    where
        V: ExecutionVenue + ?Sized,
    {
        if quantity > self.limits.max_order_size {
            return GateResult::Block {
                gate: "max_order_size",
                reason: format!(
                    "quantity {} exceeds max_order_size {}",
                    quantity, self.limits.max_order_size
                ),
            };
        }

        let position = venue.position(self.book);
        let balance = venue.balance_state(self.book);
        trace!(
            position = %position,
            balance = %balance.balance,
            "Risk gate read account state"
        );

        if position > self.limits.max_position_size.inner() {
            return GateResult::Block {
                gate: "max_position",
                reason: format!(
                    "position {} exceeds max_position_size {}",
                    position, self.limits.max_position_size
                ),
            };
        }

        GateResult::Pass
    }

    /// `true` if every gate passes.
    pub fn admit<V>(&self, venue: &V, quantity: Size) -> bool
    where
        V: ExecutionVenue + ?Sized,
    {
        match self.check(venue, quantity) {
            GateResult::Pass => true,
            GateResult::Block { gate, reason } => {
                debug!(gate, %reason, "Risk gate blocked order");
                false
            }
        }
    }
}
