//! Replay application wiring.
//!
//! Builds the strategy stack from [`AppConfig`], loads recorded tick data and
//! runs the strategy loop against the replay exchange.

use obi_core::BookSnapshot;
use obi_executor::OrderLifecycleManager;
use obi_mm::QuotingEngine;
use obi_risk::RiskGate;
use obi_sim::{ReplayExchange, TickReader};
use obi_telemetry::Metrics;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::strategy_loop::{RunSummary, StrategyLoop};

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Create an application from validated configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Wire a strategy loop over a replay of `snapshots`.
    pub fn build_loop(&self, snapshots: Vec<BookSnapshot>) -> AppResult<StrategyLoop<ReplayExchange>> {
        let exchange = ReplayExchange::new(snapshots, self.config.simulation.clone())?;
        let gate = RiskGate::new(self.config.risk.clone(), self.config.book_index)?;
        let orders = OrderLifecycleManager::new(self.config.book_index, gate, &self.config.orders);
        let engine = QuotingEngine::new(self.config.strategy.clone());
        Ok(StrategyLoop::new(exchange, engine, orders))
    }

    /// Load the configured tick data and replay it to the end.
    pub fn run(&self) -> AppResult<RunSummary> {
        let path = self
            .config
            .data_path
            .as_ref()
            .ok_or_else(|| AppError::Config("data_path is not set".to_string()))?;

        let snapshots = TickReader::new(self.config.instrument.as_str()).read_path(path)?;
        info!(
            instrument = %self.config.instrument,
            snapshots = snapshots.len(),
            capture_bp = %self.config.strategy.capture_bp,
            delta_diff_to_trade = %self.config.strategy.delta_diff_to_trade,
            "Starting replay"
        );

        let mut strategy = self.build_loop(snapshots)?;
        let summary = strategy.run()?;

        let metrics = Metrics::snapshot();
        info!(
            ticks = summary.ticks,
            trade_ticks = summary.trade_ticks,
            orders_submitted = summary.orders_submitted,
            orders_rejected = summary.orders_rejected,
            final_position = %summary.final_position,
            final_balance = %summary.final_balance,
            open_orders = strategy.venue().open_order_count(),
            inactive_clears = metrics.inactive_clears,
            "Replay finished"
        );

        Ok(summary)
    }
}
