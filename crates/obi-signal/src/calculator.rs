//! Snapshot to signal conversion.

use obi_core::BookSnapshot;
use tracing::trace;

use crate::error::{SignalError, SignalResult};
use crate::signal::ImbalanceSignal;

/// Computes the top-of-book quantity imbalance.
///
/// Stateless: the same snapshot always yields the same signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImbalanceCalculator;

impl ImbalanceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Build the signal for one snapshot.
    ///
    /// Crossed or locked books, non-positive prices, negative quantities and
    /// an empty touch all fail with [`SignalError::InvalidBookState`].
    pub fn compute(&self, snapshot: &BookSnapshot) -> SignalResult<ImbalanceSignal> {
        let state = snapshot.state();
        if !state.is_valid() {
            return Err(SignalError::InvalidBookState {
                state,
                snapshot: snapshot.clone(),
            });
        }

        let total_volume = snapshot.total_depth();
        let ratio =
            (snapshot.bid_qty.inner() - snapshot.ask_qty.inner()) / total_volume.inner();

        trace!(
            timestamp = snapshot.timestamp,
            bid = %snapshot.bid_price,
            ask = %snapshot.ask_price,
            ratio = %ratio,
            total_volume = %total_volume,
            "Imbalance computed"
        );

        Ok(ImbalanceSignal {
            timestamp: snapshot.timestamp,
            bid_price: snapshot.bid_price,
            ask_price: snapshot.ask_price,
            ratio,
            total_volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Pressure;
    use obi_core::{BookState, Price, Size};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn snap(bid: Decimal, bq: Decimal, ask: Decimal, aq: Decimal) -> BookSnapshot {
        BookSnapshot::new(
            1_000,
            Price::new(bid),
            Size::new(bq),
            Price::new(ask),
            Size::new(aq),
        )
    }

    #[test]
    fn test_reference_book() {
        let signal = ImbalanceCalculator::new()
            .compute(&snap(dec!(100), dec!(70), dec!(101), dec!(30)))
            .unwrap();

        assert_eq!(signal.ratio, dec!(0.4));
        assert_eq!(signal.total_volume, Size::new(dec!(100)));
        assert_eq!(signal.mid_price(), Price::new(dec!(100.5)));
        assert_eq!(signal.half_spread(), Price::new(dec!(0.5)));
        assert_eq!(signal.pressure(), Pressure::Buy);
        assert_eq!(signal.timestamp, 1_000);
    }

    #[test]
    fn test_ratio_stays_in_unit_interval() {
        let calc = ImbalanceCalculator::new();
        let quantities = [dec!(0), dec!(0.001), dec!(1), dec!(3), dec!(7.5), dec!(1000000)];

        for bq in quantities {
            for aq in quantities {
                if bq.is_zero() && aq.is_zero() {
                    continue;
                }
                let signal = calc.compute(&snap(dec!(10), bq, dec!(10.1), aq)).unwrap();
                assert!(signal.ratio >= dec!(-1) && signal.ratio <= dec!(1), "{bq} / {aq}");
                assert!(signal.total_volume.is_positive());
            }
        }
    }

    #[test]
    fn test_one_sided_extremes() {
        let calc = ImbalanceCalculator::new();

        let no_ask = calc.compute(&snap(dec!(10), dec!(4), dec!(11), dec!(0))).unwrap();
        assert_eq!(no_ask.ratio, Decimal::ONE);

        let no_bid = calc.compute(&snap(dec!(10), dec!(0), dec!(11), dec!(4))).unwrap();
        assert_eq!(no_bid.ratio, Decimal::NEGATIVE_ONE);

        let both = calc.compute(&snap(dec!(10), dec!(4), dec!(11), dec!(0.0001))).unwrap();
        assert!(both.ratio < Decimal::ONE);
    }

    #[test]
    fn test_balanced_book() {
        let signal = ImbalanceCalculator::new()
            .compute(&snap(dec!(10), dec!(5), dec!(11), dec!(5)))
            .unwrap();
        assert!(signal.ratio.is_zero());
        assert_eq!(signal.pressure(), Pressure::Balanced);
    }

    #[test]
    fn test_crossed_book_is_invalid() {
        let err = ImbalanceCalculator::new()
            .compute(&snap(dec!(101), dec!(1), dec!(100), dec!(1)))
            .unwrap_err();
        let SignalError::InvalidBookState { state, snapshot } = err;
        assert_eq!(state, BookState::Crossed);
        assert_eq!(snapshot.timestamp, 1_000);
    }

    #[test]
    fn test_locked_book_is_invalid() {
        let result = ImbalanceCalculator::new().compute(&snap(dec!(100), dec!(1), dec!(100), dec!(1)));
        assert!(matches!(
            result,
            Err(SignalError::InvalidBookState { state: BookState::Locked, .. })
        ));
    }

    #[test]
    fn test_zero_depth_is_invalid() {
        let result = ImbalanceCalculator::new().compute(&snap(dec!(100), dec!(0), dec!(101), dec!(0)));
        assert!(matches!(
            result,
            Err(SignalError::InvalidBookState { state: BookState::NoDepth, .. })
        ));
    }

    #[test]
    fn test_error_message_names_timestamp() {
        let err = ImbalanceCalculator::new()
            .compute(&snap(dec!(101), dec!(1), dec!(100), dec!(2)))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CROSSED"));
        assert!(msg.contains("t=1000"));
    }

    #[test]
    fn test_idempotent() {
        let calc = ImbalanceCalculator::new();
        let s = snap(dec!(99.9), dec!(12.5), dec!(100.1), dec!(3.25));
        assert_eq!(calc.compute(&s).unwrap(), calc.compute(&s).unwrap());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let signal = ImbalanceCalculator::new()
            .compute(&snap(dec!(100), dec!(85), dec!(101), dec!(15)))
            .unwrap();
        assert_eq!(signal.ratio, dec!(0.7));
        assert!(signal.reaches(dec!(0.7)));
        assert!(!signal.reaches(dec!(0.71)));
    }
}
