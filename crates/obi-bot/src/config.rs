//! Application configuration.

use crate::error::{AppError, AppResult};
use obi_executor::OrderManagerConfig;
use obi_mm::StrategyConfig;
use obi_risk::RiskLimits;
use obi_sim::SimConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level configuration for a replay run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Symbol kept from multi-symbol recordings (case-insensitive).
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// Recorded tick data to replay.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Book the strategy trades. The replay exchange exposes book 0 only.
    #[serde(default)]
    pub book_index: usize,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub risk: RiskLimits,
    #[serde(default)]
    pub orders: OrderManagerConfig,
    #[serde(default)]
    pub simulation: SimConfig,
}

fn default_instrument() -> String {
    "btcusdt".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instrument: default_instrument(),
            data_path: None,
            book_index: 0,
            strategy: StrategyConfig::default(),
            risk: RiskLimits::default(),
            orders: OrderManagerConfig::default(),
            simulation: SimConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Check every section; the first problem found is returned.
    pub fn validate(&self) -> AppResult<()> {
        if self.instrument.trim().is_empty() {
            return Err(AppError::Config("instrument must not be empty".to_string()));
        }
        self.strategy
            .validate()
            .map_err(|e| AppError::Config(format!("strategy: {e}")))?;
        self.risk
            .validate()
            .map_err(|e| AppError::Config(format!("risk: {e}")))?;
        self.simulation
            .validate()
            .map_err(|e| AppError::Config(format!("simulation: {e}")))?;

        if self.book_index != 0 {
            warn!(
                book_index = self.book_index,
                "Replay data carries a single book; orders for other books are ignored"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obi_core::{OrderType, Size};
    use obi_executor::RejectedIdPolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.instrument, "btcusdt");
        assert_eq!(config.book_index, 0);
        assert!(config.data_path.is_none());
        assert_eq!(config.strategy.capture_bp, dec!(10));
        assert_eq!(config.strategy.delta_diff_to_trade, dec!(0.3));
        assert_eq!(config.risk.max_order_size, Size::new(dec!(1000)));
        assert_eq!(config.orders.rejected_id_policy, RejectedIdPolicy::Preserve);
        config.validate().unwrap();
    }

    #[test]
    fn test_sections_parse() {
        let config = AppConfig::from_toml(
            r#"
instrument = "ethusdt"
data_path = "data/eth.jsonl"

[strategy]
capture_bp = "25"
delta_diff_to_trade = "0.2"
poll_interval_ms = 500
order_type = "market"

[risk]
max_order_size = "5"
max_position_size = "50"

[orders]
rejected_id_policy = "consume"
"#,
        )
        .unwrap();

        assert_eq!(config.instrument, "ethusdt");
        assert_eq!(config.data_path, Some(PathBuf::from("data/eth.jsonl")));
        assert_eq!(config.strategy.capture_bp, dec!(25));
        assert_eq!(config.strategy.delta_diff_to_trade, dec!(0.2));
        assert_eq!(config.strategy.poll_interval_ms, 500);
        assert_eq!(config.strategy.order_type, OrderType::Market);
        assert_eq!(config.risk.max_order_size, Size::new(dec!(5)));
        assert_eq!(config.risk.max_position_size, Size::new(dec!(50)));
        assert_eq!(config.orders.rejected_id_policy, RejectedIdPolicy::Consume);
    }

    #[test]
    fn test_shipped_default_config_matches_defaults() {
        let config = AppConfig::from_toml(include_str!("../../../config/default.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.strategy, StrategyConfig::default());
        assert_eq!(config.risk, RiskLimits::default());
        assert_eq!(config.orders, OrderManagerConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml("instrument = [").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_risk_limits() {
        let mut config = AppConfig::default();
        config.risk.max_position_size = Size::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_position_size"));
    }

    #[test]
    fn test_validate_rejects_empty_instrument() {
        let config = AppConfig {
            instrument: "  ".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
