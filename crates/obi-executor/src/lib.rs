//! Order entry for the order-book-imbalance market maker.
//!
//! [`OrderLifecycleManager`] is the only path from a quote decision to the
//! venue. It owns the id sequence, applies the risk gate and forwards
//! admitted orders as GTC orders of the configured type.

pub mod error;
pub mod ids;
pub mod lifecycle;

pub use error::{ExecutorError, ExecutorResult};
pub use ids::{OrderIdSequence, RejectedIdPolicy};
pub use lifecycle::{OrderLifecycleManager, OrderManagerConfig, SubmitOutcome};
