//! Strategy configuration.

use obi_core::{OrderType, BPS_PER_UNIT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Quoting parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Fraction of the touch depth to quote, and of the half-spread to offset
    /// quotes by, in basis points.
    #[serde(default = "default_capture_bp")]
    pub capture_bp: Decimal,

    /// Trade only when `|ratio| >= 1 - delta_diff_to_trade`.
    /// Values of 1 or more make every tick, including balanced books, trade.
    #[serde(default = "default_delta_diff_to_trade")]
    pub delta_diff_to_trade: Decimal,

    /// Simulated time between ticks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub order_type: OrderType,
}

fn default_capture_bp() -> Decimal {
    dec!(10)
}

fn default_delta_diff_to_trade() -> Decimal {
    dec!(0.3)
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            capture_bp: default_capture_bp(),
            delta_diff_to_trade: default_delta_diff_to_trade(),
            poll_interval_ms: default_poll_interval_ms(),
            order_type: OrderType::Limit,
        }
    }
}

impl StrategyConfig {
    /// Minimum `|ratio|` that triggers a trade.
    pub fn trade_threshold(&self) -> Decimal {
        Decimal::ONE - self.delta_diff_to_trade
    }

    /// Poll interval in simulated nanoseconds.
    pub fn poll_interval_ns(&self) -> i64 {
        i64::try_from(self.poll_interval_ms)
            .unwrap_or(i64::MAX)
            .saturating_mul(1_000_000)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capture_bp <= Decimal::ZERO {
            return Err(format!(
                "capture_bp ({}) must be positive",
                self.capture_bp
            ));
        }

        // above one unit the passive quote moves past the touch and can reach zero
        if self.capture_bp > BPS_PER_UNIT {
            return Err(format!(
                "capture_bp ({}) must not exceed {}",
                self.capture_bp, BPS_PER_UNIT
            ));
        }

        if self.delta_diff_to_trade < Decimal::ZERO {
            return Err(format!(
                "delta_diff_to_trade ({}) must be non-negative",
                self.delta_diff_to_trade
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be positive".to_string());
        }

        Ok(())
    }
}
