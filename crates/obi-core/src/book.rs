//! Top-of-book snapshots and account state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Price, Size};

/// Simulated time in nanoseconds since the Unix epoch.
pub type Timestamp = i64;

/// Nanoseconds in one second of simulated time.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Classification of a snapshot's top of book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// `bid < ask`, prices positive, depth present.
    Valid,
    /// `bid > ask`.
    Crossed,
    /// `bid == ask`.
    Locked,
    /// Bid and ask quantities sum to zero.
    NoDepth,
    /// A non-positive price on either side.
    BadPrice,
    /// A negative quantity on either side.
    NegativeQuantity,
}

impl BookState {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::Crossed => write!(f, "CROSSED"),
            Self::Locked => write!(f, "LOCKED"),
            Self::NoDepth => write!(f, "NO_DEPTH"),
            Self::BadPrice => write!(f, "BAD_PRICE"),
            Self::NegativeQuantity => write!(f, "NEGATIVE_QUANTITY"),
        }
    }
}

/// Best bid and ask with their resting quantities at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub timestamp: Timestamp,
    pub bid_price: Price,
    pub bid_qty: Size,
    pub ask_price: Price,
    pub ask_qty: Size,
}

impl BookSnapshot {
    pub fn new(
        timestamp: Timestamp,
        bid_price: Price,
        bid_qty: Size,
        ask_price: Price,
        ask_qty: Size,
    ) -> Self {
        Self {
            timestamp,
            bid_price,
            bid_qty,
            ask_price,
            ask_qty,
        }
    }

    /// Classify the snapshot. Checks run in order: prices, quantities, crossing, depth.
    pub fn state(&self) -> BookState {
        if !self.bid_price.is_positive() || !self.ask_price.is_positive() {
            return BookState::BadPrice;
        }
        if self.bid_qty.inner() < Decimal::ZERO || self.ask_qty.inner() < Decimal::ZERO {
            return BookState::NegativeQuantity;
        }
        if self.bid_price > self.ask_price {
            return BookState::Crossed;
        }
        if self.bid_price == self.ask_price {
            return BookState::Locked;
        }
        if self.total_depth().is_zero() {
            return BookState::NoDepth;
        }
        BookState::Valid
    }

    /// `(bid + ask) / 2`, without validity checks.
    pub fn mid_price(&self) -> Price {
        self.bid_price.midpoint(self.ask_price)
    }

    pub fn spread(&self) -> Price {
        self.ask_price - self.bid_price
    }

    /// Combined resting quantity at the touch.
    pub fn total_depth(&self) -> Size {
        self.bid_qty + self.ask_qty
    }

    /// Wall-clock rendering of the simulated timestamp, for logs.
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_nanos(self.timestamp)
    }
}

/// Account state reported by the venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceState {
    /// Cash balance net of traded value and fees.
    pub balance: Decimal,
    /// Signed net position.
    pub position: Decimal,
    /// Cumulative fees paid.
    pub fee: Decimal,
    /// Cumulative traded quantity.
    pub trading_volume: Decimal,
    /// Cumulative traded notional.
    pub trading_value: Decimal,
    pub num_trades: u64,
}
