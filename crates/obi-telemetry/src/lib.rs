//! Metrics and structured logging.
//!
//! - Prometheus counters for ticks, trade decisions and order flow
//! - `tracing` subscriber setup writing to stdout or a per-run log file

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogTarget};
pub use metrics::{Metrics, MetricsSnapshot};
