//! Order types shared by the strategy and the execution venue.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Price, Size};

/// Venue-facing order identifier. Assigned by the order manager, starting at 1.
pub type OrderId = u64;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns 1 for buy, -1 for sell (for position calculations).
    pub fn sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "limit"),
            Self::Market => write!(f, "market"),
        }
    }
}

/// Time-in-force for orders.
///
/// The strategy only ever sends `GoodTilCancelled`; the venue understands the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    #[serde(rename = "GTC")]
    GoodTilCancelled,
    /// Post-only: rejected if it would take liquidity.
    #[serde(rename = "GTX")]
    GoodTilCrossing,
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    #[serde(rename = "FOK")]
    FillOrKill,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoodTilCancelled => write!(f, "GTC"),
            Self::GoodTilCrossing => write!(f, "GTX"),
            Self::ImmediateOrCancel => write!(f, "IOC"),
            Self::FillOrKill => write!(f, "FOK"),
        }
    }
}

/// Venue-side lifecycle state of an order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, waiting for entry latency to elapse.
    Pending,
    /// Resting on the book.
    New,
    Filled,
    Canceled,
    Rejected,
}

impl OrderStatus {
    /// Whether the record can still trade.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::New)
    }
}

/// A fully specified order as handed to the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    pub price: Price,
    pub quantity: Size,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub post_only: bool,
}

impl Order {
    /// A GTC, non-post-only order, the only kind the strategy emits.
    pub fn gtc(
        id: OrderId,
        side: OrderSide,
        price: Price,
        quantity: Size,
        order_type: OrderType,
    ) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
            order_type,
            time_in_force: TimeInForce::GoodTilCancelled,
            post_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_side_sign() {
        assert_eq!(OrderSide::Buy.sign(), 1);
        assert_eq!(OrderSide::Sell.sign(), -1);
    }

    #[test]
    fn test_gtc_constructor() {
        let order = Order::gtc(
            7,
            OrderSide::Sell,
            Price::new(dec!(100.501)),
            Size::new(dec!(0.1)),
            OrderType::Limit,
        );
        assert_eq!(order.time_in_force, TimeInForce::GoodTilCancelled);
        assert!(!order.post_only);
        assert_eq!(order.id, 7);
    }

    #[test]
    fn test_status_activity() {
        assert!(OrderStatus::New.is_active());
        assert!(OrderStatus::Pending.is_active());
        assert!(!OrderStatus::Filled.is_active());
        assert!(!OrderStatus::Rejected.is_active());
    }

    #[test]
    fn test_tif_serde_names() {
        let json = serde_json::to_string(&TimeInForce::GoodTilCancelled).unwrap();
        assert_eq!(json, "\"GTC\"");
        let tif: TimeInForce = serde_json::from_str("\"GTX\"").unwrap();
        assert_eq!(tif, TimeInForce::GoodTilCrossing);
    }
}
