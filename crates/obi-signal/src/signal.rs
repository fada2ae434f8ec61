//! Imbalance signal value type.

use obi_core::{Price, Size, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the book carries more resting quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pressure {
    /// More quantity bid than offered (`ratio > 0`).
    Buy,
    /// More quantity offered than bid (`ratio < 0`).
    Sell,
    /// Equal quantity on both sides.
    Balanced,
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy_pressure"),
            Self::Sell => write!(f, "sell_pressure"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

/// Order-book imbalance observed on one tick.
///
/// `ratio = (bid_qty - ask_qty) / (bid_qty + ask_qty)` lies in `[-1, 1]`
/// and `total_volume = bid_qty + ask_qty` is strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImbalanceSignal {
    pub timestamp: Timestamp,
    pub bid_price: Price,
    pub ask_price: Price,
    pub ratio: Decimal,
    pub total_volume: Size,
}

impl ImbalanceSignal {
    pub fn mid_price(&self) -> Price {
        self.bid_price.midpoint(self.ask_price)
    }

    /// Distance from mid down to the bid.
    pub fn half_spread(&self) -> Price {
        self.mid_price() - self.bid_price
    }

    pub fn pressure(&self) -> Pressure {
        if self.ratio > Decimal::ZERO {
            Pressure::Buy
        } else if self.ratio < Decimal::ZERO {
            Pressure::Sell
        } else {
            Pressure::Balanced
        }
    }

    /// Whether `|ratio|` reaches `threshold` (inclusive).
    pub fn reaches(&self, threshold: Decimal) -> bool {
        self.ratio.abs() >= threshold
    }
}
