//! Core domain types for the order-book-imbalance market maker.
//!
//! - `Price`, `Size`: exact decimal numerics
//! - `BookSnapshot`, `BalanceState`: market and account state
//! - `Order`, `OrderSide`, `OrderType`, `TimeInForce`: order description
//! - `MarketData`, `ExecutionVenue`: the contract every market simulation implements

pub mod book;
pub mod decimal;
pub mod error;
pub mod order;
pub mod venue;

pub use book::{BalanceState, BookSnapshot, BookState, Timestamp, NANOS_PER_SECOND};
pub use decimal::{Price, Size, BPS_PER_UNIT};
pub use error::{CoreError, Result};
pub use order::{Order, OrderId, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use venue::{BookId, ExecutionVenue, MarketData, MockVenue, VenueEvent};
