//! Pre-trade risk gate.
//!
//! Every order passes two checks before it reaches the venue:
//! - MaxOrderSize: requested quantity within the per-order limit
//! - MaxPosition: current net position within the position ceiling
//!
//! The gate keeps no state between calls; position is read from the venue
//! on every check.

pub mod error;
pub mod gates;

pub use error::{RiskError, RiskResult};
pub use gates::{GateResult, RiskGate, RiskLimits};
