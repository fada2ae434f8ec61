//! Imbalance-driven market making.
//!
//! [`QuotingEngine`] reads one [`obi_signal::ImbalanceSignal`] per tick and,
//! when the imbalance is strong enough, places one passive and one aggressive
//! order around mid through the order manager.

pub mod config;
pub mod quote_engine;

pub use config::StrategyConfig;
pub use quote_engine::{Quote, QuoteOutcome, QuotePair, QuoteRole, QuotingEngine};
