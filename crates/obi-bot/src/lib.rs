//! Order-book-imbalance market maker.
//!
//! Ties the signal, quoting, risk and order crates together into a
//! tick-by-tick [`StrategyLoop`] and runs it over recorded market data.

pub mod app;
pub mod config;
pub mod error;
pub mod strategy_loop;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult, TickFailure};
pub use strategy_loop::{LoopState, RunSummary, StrategyLoop};
