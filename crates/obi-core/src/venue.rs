//! Collaborator contract between the strategy and whatever simulates the market.
//!
//! The strategy never owns market state. It borrows a venue for the duration of
//! each call and talks to it only through these two traits:
//! - [`MarketData`]: simulated clock and top of book
//! - [`ExecutionVenue`]: order entry, housekeeping and account state

use rust_decimal::Decimal;
use std::collections::VecDeque;

use crate::book::{BalanceState, BookSnapshot, Timestamp};
use crate::decimal::{Price, Size};
use crate::order::{Order, OrderId, OrderSide};

/// Index of an order book inside the venue. Single-instrument runs use 0.
pub type BookId = usize;

/// Simulated clock and market data.
pub trait MarketData {
    /// Move the clock forward by `duration_ns`.
    ///
    /// Returns `false` once the data source is exhausted.
    fn advance_time(&mut self, duration_ns: i64) -> bool;

    fn current_time(&self) -> Timestamp;

    /// Best bid price and the quantity resting there.
    fn best_bid(&self, book: BookId) -> (Price, Size);

    /// Best ask price and the quantity resting there.
    fn best_ask(&self, book: BookId) -> (Price, Size);

    /// Top of book stamped with the current time.
    fn snapshot(&self, book: BookId) -> BookSnapshot {
        let (bid_price, bid_qty) = self.best_bid(book);
        let (ask_price, ask_qty) = self.best_ask(book);
        BookSnapshot::new(self.current_time(), bid_price, bid_qty, ask_price, ask_qty)
    }
}

/// Order entry and account state.
pub trait ExecutionVenue {
    fn submit_buy_order(&mut self, book: BookId, order: &Order);

    fn submit_sell_order(&mut self, book: BookId, order: &Order);

    /// Drop order records that can no longer trade.
    fn cancel_inactive_orders(&mut self, book: BookId);

    /// Signed net position.
    fn position(&self, book: BookId) -> Decimal;

    fn balance_state(&self, book: BookId) -> BalanceState;

    /// Route an order to the side-specific entry point.
    fn submit_order(&mut self, book: BookId, order: &Order) {
        match order.side {
            OrderSide::Buy => self.submit_buy_order(book, order),
            OrderSide::Sell => self.submit_sell_order(book, order),
        }
    }
}

/// A call that reached a [`MockVenue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueEvent {
    Advance(i64),
    Cancel(BookId),
    Buy(OrderId),
    Sell(OrderId),
}

/// Scripted venue for testing.
///
/// Each `advance_time` call moves to the next scripted snapshot and reports
/// end of data once the script is empty. Every call that reaches the venue
/// is recorded.
#[derive(Debug, Default)]
pub struct MockVenue {
    script: VecDeque<BookSnapshot>,
    current: Option<BookSnapshot>,
    advances: Vec<i64>,
    submissions: Vec<(BookId, Order)>,
    events: Vec<VenueEvent>,
    cancel_calls: usize,
    position: Decimal,
    balance: BalanceState,
}

impl MockVenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Venue that replays `snapshots` one per `advance_time` call.
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = BookSnapshot>) -> Self {
        Self {
            script: snapshots.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the position reported from now on.
    pub fn set_position(&mut self, position: Decimal) {
        self.position = position;
        self.balance.position = position;
    }

    pub fn set_balance(&mut self, balance: BalanceState) {
        self.position = balance.position;
        self.balance = balance;
    }

    /// Durations passed to `advance_time`, in call order.
    pub fn advances(&self) -> &[i64] {
        &self.advances
    }

    /// Orders received, in arrival order.
    pub fn submissions(&self) -> &[(BookId, Order)] {
        &self.submissions
    }

    /// Every advance, cancel and submission, in call order.
    pub fn events(&self) -> &[VenueEvent] {
        &self.events
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl MarketData for MockVenue {
    fn advance_time(&mut self, duration_ns: i64) -> bool {
        self.advances.push(duration_ns);
        self.events.push(VenueEvent::Advance(duration_ns));
        match self.script.pop_front() {
            Some(next) => {
                self.current = Some(next);
                true
            }
            None => false,
        }
    }

    fn current_time(&self) -> Timestamp {
        self.current.as_ref().map(|s| s.timestamp).unwrap_or_default()
    }

    fn best_bid(&self, _book: BookId) -> (Price, Size) {
        self.current
            .as_ref()
            .map(|s| (s.bid_price, s.bid_qty))
            .unwrap_or((Price::ZERO, Size::ZERO))
    }

    fn best_ask(&self, _book: BookId) -> (Price, Size) {
        self.current
            .as_ref()
            .map(|s| (s.ask_price, s.ask_qty))
            .unwrap_or((Price::ZERO, Size::ZERO))
    }
}

impl ExecutionVenue for MockVenue {
    fn submit_buy_order(&mut self, book: BookId, order: &Order) {
        self.events.push(VenueEvent::Buy(order.id));
        self.submissions.push((book, order.clone()));
    }

    fn submit_sell_order(&mut self, book: BookId, order: &Order) {
        self.events.push(VenueEvent::Sell(order.id));
        self.submissions.push((book, order.clone()));
    }

    fn cancel_inactive_orders(&mut self, book: BookId) {
        self.events.push(VenueEvent::Cancel(book));
        self.cancel_calls += 1;
    }

    fn position(&self, _book: BookId) -> Decimal {
        self.position
    }

    fn balance_state(&self, _book: BookId) -> BalanceState {
        self.balance.clone()
    }
}
