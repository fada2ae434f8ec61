//! Order-book imbalance signal.
//!
//! Turns a top-of-book snapshot into an [`ImbalanceSignal`] carrying the
//! bid/ask quantity ratio and the combined depth at the touch.

pub mod calculator;
pub mod error;
pub mod signal;

pub use calculator::ImbalanceCalculator;
pub use error::{SignalError, SignalResult};
pub use signal::{ImbalanceSignal, Pressure};
