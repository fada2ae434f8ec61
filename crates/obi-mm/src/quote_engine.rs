//! Imbalance-driven quote calculation.
//!
//! Given a signal that clears the trade threshold:
//! - `mid = (bid + ask) / 2`
//! - `target_volume = total_volume * capture_bp / 10_000`
//! - `price_delta = capture_bp * (mid - bid) / 10_000`
//!
//! Buy pressure (`ratio > 0`) sells at `mid + 2 * price_delta`, then buys at
//! `mid - price_delta`. Sell pressure, and a balanced book when the threshold
//! lets one through, buys at `mid - 2 * price_delta`, then sells at
//! `mid - price_delta`.

use obi_core::{ExecutionVenue, Order, OrderSide, Price, Size, BPS_PER_UNIT};
use obi_executor::{ExecutorResult, OrderLifecycleManager, SubmitOutcome};
use obi_signal::{ImbalanceSignal, Pressure};
use obi_telemetry::Metrics;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::StrategyConfig;

/// Which leg of the pair a quote is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteRole {
    /// Two price deltas from mid.
    Passive,
    /// One price delta from mid.
    Aggressive,
}

/// One side of a quote decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub side: OrderSide,
    pub price: Price,
    pub size: Size,
    pub role: QuoteRole,
}

/// The two orders of a trade decision, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePair {
    pub first: Quote,
    pub second: Quote,
}

impl QuotePair {
    pub fn iter(&self) -> impl Iterator<Item = &Quote> {
        [&self.first, &self.second].into_iter()
    }
}

/// Result of handling one signal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuoteOutcome {
    /// Imbalance below the trade threshold.
    #[default]
    NoTrade,
    /// Both quotes were offered to the order manager.
    Quoted {
        submitted: Vec<Order>,
        rejected: usize,
    },
}

impl QuoteOutcome {
    pub fn traded(&self) -> bool {
        matches!(self, Self::Quoted { .. })
    }
}

/// Turns imbalance signals into quote pairs.
#[derive(Debug, Clone)]
pub struct QuotingEngine {
    config: StrategyConfig,
}

impl QuotingEngine {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Pure decision: the quote pair for `signal`, or `None` below threshold.
    pub fn decide(&self, signal: &ImbalanceSignal) -> Option<QuotePair> {
        if !signal.reaches(self.config.trade_threshold()) {
            return None;
        }

        let capture_bp = self.config.capture_bp;
        let mid = signal.mid_price();
        let target_volume = signal.total_volume * capture_bp / BPS_PER_UNIT;
        let price_delta = signal.half_spread() * capture_bp / BPS_PER_UNIT;
        let two_deltas = price_delta * Decimal::TWO;

        let quote = |side, price, role| Quote {
            side,
            price,
            size: target_volume,
            role,
        };

        let pair = match signal.pressure() {
            Pressure::Buy => QuotePair {
                first: quote(OrderSide::Sell, mid + two_deltas, QuoteRole::Passive),
                second: quote(OrderSide::Buy, mid - price_delta, QuoteRole::Aggressive),
            },
            Pressure::Sell | Pressure::Balanced => QuotePair {
                first: quote(OrderSide::Buy, mid - two_deltas, QuoteRole::Passive),
                second: quote(OrderSide::Sell, mid - price_delta, QuoteRole::Aggressive),
            },
        };
        Some(pair)
    }

    /// Handle one tick's signal.
    ///
    /// Inactive orders are cleared first, whether or not the tick trades.
    /// Each quote is submitted on its own; a risk refusal of one does not
    /// stop the other.
    pub fn on_signal<V>(
        &self,
        signal: &ImbalanceSignal,
        orders: &mut OrderLifecycleManager,
        venue: &mut V,
    ) -> ExecutorResult<QuoteOutcome>
    where
        V: ExecutionVenue + ?Sized,
    {
        orders.clear_inactive_orders(venue);

        let ratio = signal.ratio.to_f64().unwrap_or_default();
        let Some(pair) = self.decide(signal) else {
            Metrics::decision(false, ratio);
            debug!(
                timestamp = signal.timestamp,
                ratio = %signal.ratio,
                threshold = %self.config.trade_threshold(),
                "Imbalance below threshold"
            );
            return Ok(QuoteOutcome::NoTrade);
        };

        Metrics::decision(true, ratio);
        info!(
            timestamp = signal.timestamp,
            ratio = %signal.ratio,
            pressure = %signal.pressure(),
            mid = %signal.mid_price(),
            size = %pair.first.size,
            "Imbalance trade triggered"
        );

        let mut submitted = Vec::with_capacity(2);
        let mut rejected = 0;
        for quote in pair.iter() {
            match orders.submit(
                venue,
                quote.side,
                quote.price,
                quote.size,
                self.config.order_type,
            )? {
                SubmitOutcome::Submitted(order) => submitted.push(order),
                SubmitOutcome::Rejected { .. } => rejected += 1,
            }
        }

        Ok(QuoteOutcome::Quoted {
            submitted,
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obi_core::{BalanceState, BookId, BookSnapshot, MockVenue, VenueEvent};
    use obi_executor::{OrderManagerConfig, RejectedIdPolicy};
    use obi_risk::{RiskGate, RiskLimits};
    use obi_signal::ImbalanceCalculator;
    use rust_decimal_macros::dec;
    use std::cell::Cell;

    fn signal(bid_qty: Decimal, ask_qty: Decimal) -> ImbalanceSignal {
        let snapshot = BookSnapshot::new(
            0,
            Price::new(dec!(100)),
            Size::new(bid_qty),
            Price::new(dec!(101)),
            Size::new(ask_qty),
        );
        ImbalanceCalculator::new().compute(&snapshot).unwrap()
    }

    fn engine(delta: Decimal) -> QuotingEngine {
        QuotingEngine::new(StrategyConfig {
            delta_diff_to_trade: delta,
            ..Default::default()
        })
    }

    fn manager() -> OrderLifecycleManager {
        let gate = RiskGate::new(RiskLimits::default(), 0).unwrap();
        OrderLifecycleManager::new(0, gate, &OrderManagerConfig::default())
    }

    #[test]
    fn test_buy_pressure_pricing() {
        // ratio 0.4 against a 0.4 threshold
        let pair = engine(dec!(0.6)).decide(&signal(dec!(70), dec!(30))).unwrap();

        // mid = 100.5, target = 100 * 10 / 10000 = 0.1
        // delta = 10 * 0.5 / 10000 = 0.0005
        assert_eq!(pair.first.side, OrderSide::Sell);
        assert_eq!(pair.first.price.inner(), dec!(100.501));
        assert_eq!(pair.first.size.inner(), dec!(0.1));
        assert_eq!(pair.first.role, QuoteRole::Passive);

        assert_eq!(pair.second.side, OrderSide::Buy);
        assert_eq!(pair.second.price.inner(), dec!(100.4995));
        assert_eq!(pair.second.size.inner(), dec!(0.1));
        assert_eq!(pair.second.role, QuoteRole::Aggressive);
    }

    #[test]
    fn test_sell_pressure_pricing() {
        let pair = engine(dec!(0.3)).decide(&signal(dec!(10), dec!(90))).unwrap();

        assert_eq!(pair.first.side, OrderSide::Buy);
        assert_eq!(pair.first.price.inner(), dec!(100.499));
        assert_eq!(pair.second.side, OrderSide::Sell);
        assert_eq!(pair.second.price.inner(), dec!(100.4995));
        assert_eq!(pair.second.size.inner(), dec!(0.1));
    }

    #[test]
    fn test_threshold_boundaries() {
        let engine = engine(dec!(0.3));

        // 0.65 < 0.7
        assert!(engine.decide(&signal(dec!(82.5), dec!(17.5))).is_none());
        // 0.75 >= 0.7
        assert!(engine.decide(&signal(dec!(87.5), dec!(12.5))).is_some());
        // exactly 0.7 trades
        assert!(engine.decide(&signal(dec!(85), dec!(15))).is_some());
        // -0.7 trades too
        assert!(engine.decide(&signal(dec!(15), dec!(85))).is_some());
    }

    #[test]
    fn test_reference_book_below_default_threshold() {
        // ratio 0.4 does not trade with the default delta
        assert!(QuotingEngine::new(StrategyConfig::default())
            .decide(&signal(dec!(70), dec!(30)))
            .is_none());
    }

    #[test]
    fn test_balanced_book_uses_sell_pressure_formulas() {
        let pair = engine(dec!(1)).decide(&signal(dec!(50), dec!(50))).unwrap();

        assert_eq!(pair.first.side, OrderSide::Buy);
        assert_eq!(pair.first.price.inner(), dec!(100.499));
        assert_eq!(pair.second.side, OrderSide::Sell);
        assert_eq!(pair.second.price.inner(), dec!(100.4995));
    }

    #[test]
    fn test_balanced_book_does_not_trade_below_full_delta() {
        assert!(engine(dec!(0.99)).decide(&signal(dec!(50), dec!(50))).is_none());
    }

    #[test]
    fn test_no_trade_still_clears_once() {
        let mut venue = MockVenue::new();
        let mut orders = manager();

        let outcome = engine(dec!(0.3))
            .on_signal(&signal(dec!(70), dec!(30)), &mut orders, &mut venue)
            .unwrap();

        assert_eq!(outcome, QuoteOutcome::NoTrade);
        assert_eq!(venue.events(), &[VenueEvent::Cancel(0)]);
    }

    #[test]
    fn test_trade_submits_pair_in_order() {
        let mut venue = MockVenue::new();
        let mut orders = manager();

        let outcome = engine(dec!(0.3))
            .on_signal(&signal(dec!(90), dec!(10)), &mut orders, &mut venue)
            .unwrap();

        assert!(outcome.traded());
        assert_eq!(venue.cancel_calls(), 1);
        let subs: Vec<_> = venue
            .submissions()
            .iter()
            .map(|(_, o)| (o.id, o.side))
            .collect();
        assert_eq!(subs, vec![(1, OrderSide::Sell), (2, OrderSide::Buy)]);
    }

    #[test]
    fn test_clear_precedes_submissions() {
        let mut venue = MockVenue::new();
        let mut orders = manager();
        let engine = engine(dec!(0.3));

        engine
            .on_signal(&signal(dec!(90), dec!(10)), &mut orders, &mut venue)
            .unwrap();
        engine
            .on_signal(&signal(dec!(10), dec!(90)), &mut orders, &mut venue)
            .unwrap();

        // buy pressure sells first, sell pressure buys first
        assert_eq!(
            venue.events(),
            &[
                VenueEvent::Cancel(0),
                VenueEvent::Sell(1),
                VenueEvent::Buy(2),
                VenueEvent::Cancel(0),
                VenueEvent::Buy(3),
                VenueEvent::Sell(4),
            ]
        );
    }

    /// Reports a large position on the first read only.
    #[derive(Default)]
    struct FirstReadOverLimit {
        inner: MockVenue,
        reads: Cell<u32>,
    }

    impl ExecutionVenue for FirstReadOverLimit {
        fn submit_buy_order(&mut self, book: BookId, order: &Order) {
            self.inner.submit_buy_order(book, order);
        }

        fn submit_sell_order(&mut self, book: BookId, order: &Order) {
            self.inner.submit_sell_order(book, order);
        }

        fn cancel_inactive_orders(&mut self, book: BookId) {
            self.inner.cancel_inactive_orders(book);
        }

        fn position(&self, _book: BookId) -> Decimal {
            let reads = self.reads.get();
            self.reads.set(reads + 1);
            if reads == 0 {
                dec!(5000)
            } else {
                Decimal::ZERO
            }
        }

        fn balance_state(&self, book: BookId) -> BalanceState {
            self.inner.balance_state(book)
        }
    }

    #[test]
    fn test_rejections_are_independent() {
        let mut venue = FirstReadOverLimit::default();
        let mut orders = manager();

        let outcome = engine(dec!(0.3))
            .on_signal(&signal(dec!(90), dec!(10)), &mut orders, &mut venue)
            .unwrap();

        let QuoteOutcome::Quoted {
            submitted,
            rejected,
        } = outcome
        else {
            panic!("expected a trade");
        };
        assert_eq!(rejected, 1);
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].side, OrderSide::Buy);
        assert_eq!(submitted[0].id, 1);
    }

    #[test]
    fn test_consumed_ids_policy_through_engine() {
        let gate = RiskGate::new(RiskLimits::default(), 0).unwrap();
        let config = OrderManagerConfig {
            rejected_id_policy: RejectedIdPolicy::Consume,
        };
        let mut orders = OrderLifecycleManager::new(0, gate, &config);
        let mut venue = FirstReadOverLimit::default();

        engine(dec!(0.3))
            .on_signal(&signal(dec!(90), dec!(10)), &mut orders, &mut venue)
            .unwrap();

        assert_eq!(venue.inner.submissions()[0].1.id, 2);
    }
}
