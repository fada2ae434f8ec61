//! Per-tick strategy driver.
//!
//! Each tick:
//! 1. advance the simulated clock by the poll interval (end of data drains the loop)
//! 2. read the top of book and compute the imbalance signal
//! 3. clear inactive orders, then quote if the imbalance is strong enough
//!
//! An invalid book or an order contract violation aborts the run with the
//! tick number and timestamp attached.

use obi_core::{BookId, BookSnapshot, ExecutionVenue, MarketData, Timestamp};
use obi_executor::OrderLifecycleManager;
use obi_mm::{QuoteOutcome, QuotingEngine};
use obi_signal::ImbalanceCalculator;
use obi_telemetry::Metrics;
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, TickFailure};

/// Loop lifecycle. `Drained` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Drained,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub trade_ticks: u64,
    pub orders_submitted: u64,
    pub orders_rejected: u64,
    pub final_position: Decimal,
    pub final_balance: Decimal,
    pub last_timestamp: Option<Timestamp>,
}

/// Drives one book of a venue until its data runs out.
pub struct StrategyLoop<V> {
    venue: V,
    book: BookId,
    calculator: ImbalanceCalculator,
    engine: QuotingEngine,
    orders: OrderLifecycleManager,
    poll_interval_ns: i64,
    state: LoopState,
    ticks: u64,
    trade_ticks: u64,
    last_snapshot: Option<BookSnapshot>,
}

impl<V> StrategyLoop<V>
where
    V: MarketData + ExecutionVenue,
{
    pub fn new(venue: V, engine: QuotingEngine, orders: OrderLifecycleManager) -> Self {
        let poll_interval_ns = engine.config().poll_interval_ns();
        Self {
            venue,
            book: orders.book(),
            calculator: ImbalanceCalculator::new(),
            engine,
            orders,
            poll_interval_ns,
            state: LoopState::Running,
            ticks: 0,
            trade_ticks: 0,
            last_snapshot: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn venue(&self) -> &V {
        &self.venue
    }

    pub fn into_venue(self) -> V {
        self.venue
    }

    /// Run one tick.
    ///
    /// Returns the state after the tick. Once drained, further calls do
    /// nothing and never touch the venue.
    pub fn step(&mut self) -> AppResult<LoopState> {
        if self.state == LoopState::Drained {
            return Ok(LoopState::Drained);
        }

        if !self.venue.advance_time(self.poll_interval_ns) {
            self.state = LoopState::Drained;
            info!(
                ticks = self.ticks,
                last_time = ?self.last_snapshot.as_ref().map(BookSnapshot::time),
                "Market data exhausted"
            );
            return Ok(LoopState::Drained);
        }

        self.ticks += 1;
        Metrics::tick();

        let snapshot = self.venue.snapshot(self.book);
        let signal = self
            .calculator
            .compute(&snapshot)
            .map_err(|e| self.abort(&snapshot, e.into()))?;

        let outcome = self
            .engine
            .on_signal(&signal, &mut self.orders, &mut self.venue)
            .map_err(|e| self.abort(&snapshot, e.into()))?;
        self.last_snapshot = Some(snapshot);

        if let QuoteOutcome::Quoted {
            submitted,
            rejected,
        } = &outcome
        {
            self.trade_ticks += 1;
            debug!(
                tick = self.ticks,
                submitted = submitted.len(),
                rejected,
                "Tick quoted"
            );
        }

        Ok(LoopState::Running)
    }

    /// Step until drained.
    pub fn run(&mut self) -> AppResult<RunSummary> {
        while self.step()? == LoopState::Running {}
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        let balance = self.venue.balance_state(self.book);
        RunSummary {
            ticks: self.ticks,
            trade_ticks: self.trade_ticks,
            orders_submitted: self.orders.submitted_count(),
            orders_rejected: self.orders.rejected_count(),
            final_position: self.venue.position(self.book),
            final_balance: balance.balance,
            last_timestamp: self.last_snapshot.as_ref().map(|s| s.timestamp),
        }
    }

    fn abort(&self, snapshot: &BookSnapshot, source: TickFailure) -> AppError {
        error!(
            tick = self.ticks,
            time = %snapshot.time(),
            error = %source,
            "Tick failed, stopping run"
        );
        AppError::Tick {
            tick: self.ticks,
            timestamp: snapshot.timestamp,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obi_core::{BookSnapshot, MockVenue, OrderSide, Price, Size, VenueEvent};
    use obi_executor::OrderManagerConfig;
    use obi_mm::StrategyConfig;
    use obi_risk::{RiskGate, RiskLimits};
    use obi_signal::SignalError;
    use rust_decimal_macros::dec;

    fn book(ts: Timestamp, bid_qty: Decimal, ask_qty: Decimal) -> BookSnapshot {
        BookSnapshot::new(
            ts,
            Price::new(dec!(100)),
            Size::new(bid_qty),
            Price::new(dec!(101)),
            Size::new(ask_qty),
        )
    }

    fn strategy_loop(venue: MockVenue) -> StrategyLoop<MockVenue> {
        let gate = RiskGate::new(RiskLimits::default(), 0).unwrap();
        let orders = OrderLifecycleManager::new(0, gate, &OrderManagerConfig::default());
        StrategyLoop::new(venue, QuotingEngine::new(StrategyConfig::default()), orders)
    }

    #[test]
    fn test_no_data_means_zero_ticks() {
        let mut strategy = strategy_loop(MockVenue::new());

        let summary = strategy.run().unwrap();

        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.last_timestamp, None);
        assert_eq!(strategy.state(), LoopState::Drained);
        assert_eq!(strategy.venue().cancel_calls(), 0);
        assert!(strategy.venue().submissions().is_empty());
    }

    #[test]
    fn test_quiet_ticks_only_clear() {
        let venue = MockVenue::with_snapshots(vec![
            book(1, dec!(70), dec!(30)),
            book(2, dec!(50), dec!(50)),
            book(3, dec!(40), dec!(60)),
        ]);
        let mut strategy = strategy_loop(venue);

        let summary = strategy.run().unwrap();

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.trade_ticks, 0);
        assert_eq!(strategy.venue().cancel_calls(), 3);
        assert!(strategy.venue().submissions().is_empty());
    }

    #[test]
    fn test_strong_imbalance_places_both_quotes() {
        let venue = MockVenue::with_snapshots(vec![book(1, dec!(90), dec!(10))]);
        let mut strategy = strategy_loop(venue);

        let summary = strategy.run().unwrap();

        assert_eq!(summary.trade_ticks, 1);
        assert_eq!(summary.orders_submitted, 2);
        let subs = strategy.venue().submissions();
        assert_eq!(subs[0].1.id, 1);
        assert_eq!(subs[0].1.side, OrderSide::Sell);
        assert_eq!(subs[1].1.id, 2);
        assert_eq!(subs[1].1.side, OrderSide::Buy);
        assert_eq!(
            strategy.venue().events(),
            &[
                VenueEvent::Advance(1_000_000_000),
                VenueEvent::Cancel(0),
                VenueEvent::Sell(1),
                VenueEvent::Buy(2),
                VenueEvent::Advance(1_000_000_000),
            ]
        );
    }

    #[test]
    fn test_advances_by_poll_interval() {
        let venue = MockVenue::with_snapshots(vec![book(1, dec!(1), dec!(1))]);
        let mut strategy = strategy_loop(venue);

        strategy.run().unwrap();

        // one successful advance, then the one that reports end of data
        assert_eq!(strategy.venue().advances(), &[1_000_000_000, 1_000_000_000]);
    }

    #[test]
    fn test_crossed_book_aborts_with_context() {
        let crossed = BookSnapshot::new(
            2_000,
            Price::new(dec!(102)),
            Size::new(dec!(1)),
            Price::new(dec!(101)),
            Size::new(dec!(1)),
        );
        let venue = MockVenue::with_snapshots(vec![book(1_000, dec!(1), dec!(1)), crossed]);
        let mut strategy = strategy_loop(venue);

        let err = strategy.run().unwrap_err();

        let AppError::Tick {
            tick,
            timestamp,
            source,
        } = err
        else {
            panic!("unexpected error kind");
        };
        assert_eq!(tick, 2);
        assert_eq!(timestamp, 2_000);
        assert!(matches!(
            source,
            TickFailure::Signal(SignalError::InvalidBookState { .. })
        ));
        // the bad tick never reached order handling
        assert_eq!(strategy.venue().cancel_calls(), 1);
    }

    #[test]
    fn test_step_after_drain_is_noop() {
        let mut strategy = strategy_loop(MockVenue::new());

        assert_eq!(strategy.step().unwrap(), LoopState::Drained);
        assert_eq!(strategy.step().unwrap(), LoopState::Drained);
        assert_eq!(strategy.venue().advances().len(), 1);
    }

    #[test]
    fn test_summary_reads_account_state() {
        let mut venue = MockVenue::new();
        venue.set_position(dec!(-3));
        let mut strategy = strategy_loop(venue);

        let summary = strategy.run().unwrap();
        assert_eq!(summary.final_position, dec!(-3));
        assert_eq!(summary.final_balance, Decimal::ZERO);
    }
}
