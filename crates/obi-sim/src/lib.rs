//! Tick-data replay for the order-book-imbalance market maker.
//!
//! - [`TickReader`]: loads top-of-book snapshots from recorded market data
//! - [`ReplayExchange`]: implements the venue contract over those snapshots

pub mod config;
pub mod error;
pub mod exchange;
pub mod reader;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use exchange::{ReplayExchange, SimOrder, REPLAY_BOOK};
pub use reader::TickReader;
