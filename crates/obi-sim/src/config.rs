//! Replay exchange configuration.

use obi_core::{Price, Size};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Instrument and execution model parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Price grid; buy prices round down to it, sell prices round up.
    #[serde(default = "default_tick_size")]
    pub tick_size: Price,

    /// Quantity grid; order quantities round down to it.
    #[serde(default = "default_lot_size")]
    pub lot_size: Size,

    /// Fee on resting fills, as a fraction of traded value.
    #[serde(default = "default_maker_fee")]
    pub maker_fee: Decimal,

    /// Fee on marketable fills, as a fraction of traded value.
    #[serde(default = "default_taker_fee")]
    pub taker_fee: Decimal,

    /// Delay between submission and the order reaching the book.
    #[serde(default = "default_entry_latency_ns")]
    pub entry_latency_ns: i64,

    #[serde(default)]
    pub initial_balance: Decimal,
}

fn default_tick_size() -> Price {
    Price::new(dec!(0.1))
}

fn default_lot_size() -> Size {
    Size::new(dec!(0.001))
}

fn default_maker_fee() -> Decimal {
    dec!(0.0002)
}

fn default_taker_fee() -> Decimal {
    dec!(0.0007)
}

fn default_entry_latency_ns() -> i64 {
    10_000_000
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_size: default_tick_size(),
            lot_size: default_lot_size(),
            maker_fee: default_maker_fee(),
            taker_fee: default_taker_fee(),
            entry_latency_ns: default_entry_latency_ns(),
            initial_balance: Decimal::ZERO,
        }
    }
}

impl SimConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tick_size.is_positive() {
            return Err(format!("tick_size ({}) must be positive", self.tick_size));
        }
        if !self.lot_size.is_positive() {
            return Err(format!("lot_size ({}) must be positive", self.lot_size));
        }
        // negative maker fee is a rebate
        if self.maker_fee <= -Decimal::ONE {
            return Err(format!("maker_fee ({}) must be above -1", self.maker_fee));
        }
        if self.taker_fee < Decimal::ZERO {
            return Err(format!(
                "taker_fee ({}) must be non-negative",
                self.taker_fee
            ));
        }
        if self.entry_latency_ns < 0 {
            return Err(format!(
                "entry_latency_ns ({}) must be non-negative",
                self.entry_latency_ns
            ));
        }
        Ok(())
    }
}
