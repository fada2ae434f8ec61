//! Replay exchange.
//!
//! Walks a recorded snapshot sequence on a simulated clock and runs a simple
//! execution model against it:
//! - orders reach the book `entry_latency_ns` after submission
//! - on arrival, a market order or a marketable limit order fills in full at
//!   the touch as taker
//! - a resting order fills in full at its limit price as maker once the
//!   opposite touch reaches it
//! - no partial fills, no queue position

use obi_core::{
    BalanceState, BookId, BookSnapshot, ExecutionVenue, MarketData, Order, OrderId, OrderSide,
    OrderStatus, OrderType, Price, Size, TimeInForce, Timestamp,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// The only book a replay serves.
pub const REPLAY_BOOK: BookId = 0;

/// An order as tracked by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOrder {
    /// The order after tick and lot rounding.
    pub order: Order,
    pub status: OrderStatus,
    /// Time the order reaches the book.
    pub active_at: Timestamp,
    /// Fill price, once filled.
    pub exec_price: Option<Price>,
}

/// Replays top-of-book snapshots and simulates execution against them.
#[derive(Debug)]
pub struct ReplayExchange {
    config: SimConfig,
    snapshots: Vec<BookSnapshot>,
    /// Index of the next snapshot to apply.
    cursor: usize,
    now: Timestamp,
    book: Option<BookSnapshot>,
    orders: BTreeMap<OrderId, SimOrder>,
    state: BalanceState,
}

impl ReplayExchange {
    /// Build an exchange positioned on the first snapshot.
    pub fn new(mut snapshots: Vec<BookSnapshot>, config: SimConfig) -> SimResult<Self> {
        config.validate().map_err(SimError::Config)?;
        snapshots.sort_by_key(|s| s.timestamp);

        let now = snapshots.first().map(|s| s.timestamp).unwrap_or_default();
        let state = BalanceState {
            balance: config.initial_balance,
            ..BalanceState::default()
        };
        let mut exchange = Self {
            config,
            snapshots,
            cursor: 0,
            now,
            book: None,
            orders: BTreeMap::new(),
            state,
        };
        exchange.replay_until(now);
        Ok(exchange)
    }

    /// Order record by id, while the exchange still holds it.
    pub fn order(&self, id: OrderId) -> Option<&SimOrder> {
        self.orders.get(&id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &SimOrder> {
        self.orders.values()
    }

    /// Orders still able to trade.
    pub fn open_order_count(&self) -> usize {
        self.orders
            .values()
            .filter(|o| o.status.is_active())
            .count()
    }

    pub fn snapshots_remaining(&self) -> usize {
        self.snapshots.len() - self.cursor
    }

    /// Apply every snapshot up to `until`, bringing due orders to the book
    /// before each one.
    fn replay_until(&mut self, until: Timestamp) {
        while let Some(next) = self.snapshots.get(self.cursor) {
            if next.timestamp > until {
                break;
            }
            let snapshot = next.clone();
            self.cursor += 1;

            self.activate_due(snapshot.timestamp);
            self.book = Some(snapshot);
            self.match_resting();
        }
        self.activate_due(until);
    }

    /// Move pending orders whose entry latency has elapsed onto the book.
    fn activate_due(&mut self, at: Timestamp) {
        let Some(book) = self.book.clone() else {
            return;
        };

        let due: Vec<OrderId> = self
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Pending && o.active_at <= at)
            .map(|o| o.order.id)
            .collect();

        for id in due {
            let Some(sim) = self.orders.get(&id) else {
                continue;
            };
            let order = sim.order.clone();
            match touch_if_marketable(&order, &book) {
                Some(touch) => self.fill(id, touch, self.config.taker_fee),
                None if matches!(
                    order.time_in_force,
                    TimeInForce::ImmediateOrCancel | TimeInForce::FillOrKill
                ) =>
                {
                    self.set_status(id, OrderStatus::Canceled);
                }
                None => self.set_status(id, OrderStatus::New),
            }
        }
    }

    /// Fill resting orders the current touch has reached.
    fn match_resting(&mut self) {
        let Some(book) = self.book.as_ref() else {
            return;
        };

        let crossed: Vec<(OrderId, Price)> = self
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::New)
            .filter(|o| match o.order.side {
                OrderSide::Buy => book.ask_price <= o.order.price,
                OrderSide::Sell => book.bid_price >= o.order.price,
            })
            .map(|o| (o.order.id, o.order.price))
            .collect();

        for (id, price) in crossed {
            self.fill(id, price, self.config.maker_fee);
        }
    }

    fn fill(&mut self, id: OrderId, price: Price, fee_rate: Decimal) {
        let Some(sim) = self.orders.get_mut(&id) else {
            return;
        };
        let side = sim.order.side;
        let quantity = sim.order.quantity;
        sim.status = OrderStatus::Filled;
        sim.exec_price = Some(price);

        let value = quantity.notional(price);
        let fee = value * fee_rate;
        let sign = Decimal::from(side.sign());

        self.state.position += sign * quantity.inner();
        self.state.balance -= sign * value + fee;
        self.state.fee += fee;
        self.state.trading_volume += quantity.inner();
        self.state.trading_value += value;
        self.state.num_trades += 1;

        debug!(
            order_id = id,
            side = %side,
            price = %price,
            quantity = %quantity,
            fee = %fee,
            position = %self.state.position,
            "Order filled"
        );
    }

    fn set_status(&mut self, id: OrderId, status: OrderStatus) {
        if let Some(sim) = self.orders.get_mut(&id) {
            sim.status = status;
        }
    }

    fn reject(&mut self, order: Order, reason: &str) {
        warn!(order_id = order.id, side = %order.side, reason, "Order rejected by exchange");
        self.orders.insert(
            order.id,
            SimOrder {
                order,
                status: OrderStatus::Rejected,
                active_at: self.now,
                exec_price: None,
            },
        );
    }

    fn accept(&mut self, book: BookId, order: &Order) {
        if book != REPLAY_BOOK {
            warn!(book, order_id = order.id, "Order for unknown book ignored");
            return;
        }
        if self.orders.contains_key(&order.id) {
            warn!(order_id = order.id, "Duplicate order id ignored");
            return;
        }

        let mut order = order.clone();
        order.price = order.price.round_for_side(self.config.tick_size, order.side);
        order.quantity = order.quantity.round_to_lot(self.config.lot_size);

        if order.quantity.is_zero() {
            self.reject(order, "quantity below lot size");
            return;
        }
        let post_only =
            order.post_only || order.time_in_force == TimeInForce::GoodTilCrossing;
        let would_take = self
            .book
            .as_ref()
            .is_some_and(|book| touch_if_marketable(&order, book).is_some());
        if post_only && would_take {
            self.reject(order, "post-only order would take liquidity");
            return;
        }

        trace!(
            order_id = order.id,
            side = %order.side,
            price = %order.price,
            quantity = %order.quantity,
            "Order accepted"
        );
        let id = order.id;
        self.orders.insert(
            id,
            SimOrder {
                order,
                status: OrderStatus::Pending,
                active_at: self.now.saturating_add(self.config.entry_latency_ns),
                exec_price: None,
            },
        );
        if self.config.entry_latency_ns == 0 {
            self.activate_due(self.now);
        }
    }
}

/// Price an arriving order would trade at, if it takes liquidity.
///
/// Market orders always take the touch; limit orders only when they cross it.
fn touch_if_marketable(order: &Order, book: &BookSnapshot) -> Option<Price> {
    let (touch, crosses) = match order.side {
        OrderSide::Buy => (book.ask_price, book.ask_price <= order.price),
        OrderSide::Sell => (book.bid_price, book.bid_price >= order.price),
    };
    (crosses || order.order_type == OrderType::Market).then_some(touch)
}

impl MarketData for ReplayExchange {
    fn advance_time(&mut self, duration_ns: i64) -> bool {
        if self.cursor >= self.snapshots.len() {
            return false;
        }
        self.now = self.now.saturating_add(duration_ns);
        self.replay_until(self.now);
        true
    }

    fn current_time(&self) -> Timestamp {
        self.now
    }

    fn best_bid(&self, book: BookId) -> (Price, Size) {
        match &self.book {
            Some(s) if book == REPLAY_BOOK => (s.bid_price, s.bid_qty),
            _ => (Price::ZERO, Size::ZERO),
        }
    }

    fn best_ask(&self, book: BookId) -> (Price, Size) {
        match &self.book {
            Some(s) if book == REPLAY_BOOK => (s.ask_price, s.ask_qty),
            _ => (Price::ZERO, Size::ZERO),
        }
    }
}

impl ExecutionVenue for ReplayExchange {
    fn submit_buy_order(&mut self, book: BookId, order: &Order) {
        debug_assert_eq!(order.side, OrderSide::Buy);
        self.accept(book, order);
    }

    fn submit_sell_order(&mut self, book: BookId, order: &Order) {
        debug_assert_eq!(order.side, OrderSide::Sell);
        self.accept(book, order);
    }

    fn cancel_inactive_orders(&mut self, book: BookId) {
        if book != REPLAY_BOOK {
            return;
        }
        let before = self.orders.len();
        self.orders.retain(|_, o| o.status.is_active());
        trace!(removed = before - self.orders.len(), "Inactive orders removed");
    }

    fn position(&self, book: BookId) -> Decimal {
        if book == REPLAY_BOOK {
            self.state.position
        } else {
            Decimal::ZERO
        }
    }

    fn balance_state(&self, book: BookId) -> BalanceState {
        if book == REPLAY_BOOK {
            self.state.clone()
        } else {
            BalanceState::default()
        }
    }
}
