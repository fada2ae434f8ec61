//! Prometheus metrics for a strategy run.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on duplicate
//! metric names, which is a programming error surfaced on first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_gauge, register_int_counter, register_int_counter_vec, Gauge, IntCounter,
    IntCounterVec,
};

/// Strategy ticks processed.
pub static TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("obi_ticks_total", "Strategy ticks processed").unwrap()
});

/// Trade decisions per tick.
/// Labels: decision (trade/no_trade)
pub static TRADE_DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "obi_trade_decisions_total",
        "Per-tick trade decisions",
        &["decision"]
    )
    .unwrap()
});

/// Orders forwarded to the venue.
pub static ORDERS_SUBMITTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "obi_orders_submitted_total",
        "Orders forwarded to the venue",
        &["side"]
    )
    .unwrap()
});

/// Orders refused by the risk gate.
pub static RISK_REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "obi_risk_rejections_total",
        "Orders refused by the risk gate",
        &["side"]
    )
    .unwrap()
});

/// Inactive-order cleanup requests.
pub static INACTIVE_CLEARS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "obi_inactive_clears_total",
        "Inactive order cleanup requests"
    )
    .unwrap()
});

/// Most recent imbalance ratio.
pub static IMBALANCE_RATIO: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("obi_imbalance_ratio", "Most recent order-book imbalance ratio").unwrap()
});

/// Point-in-time copy of the counters, for the end-of-run log line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub trade_ticks: u64,
    pub no_trade_ticks: u64,
    pub orders_submitted: u64,
    pub risk_rejections: u64,
    pub inactive_clears: u64,
    pub last_ratio: f64,
}

/// Recording helpers.
pub struct Metrics;

impl Metrics {
    pub fn tick() {
        TICKS_TOTAL.inc();
    }

    /// Record a trade decision and the ratio it was based on.
    pub fn decision(traded: bool, ratio: f64) {
        let label = if traded { "trade" } else { "no_trade" };
        TRADE_DECISIONS_TOTAL.with_label_values(&[label]).inc();
        IMBALANCE_RATIO.set(ratio);
    }

    pub fn order_submitted(side: &str) {
        ORDERS_SUBMITTED_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn risk_rejected(side: &str) {
        RISK_REJECTIONS_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn inactive_cleared() {
        INACTIVE_CLEARS_TOTAL.inc();
    }

    pub fn snapshot() -> MetricsSnapshot {
        let sum_sides = |vec: &IntCounterVec| {
            ["buy", "sell"]
                .iter()
                .map(|side| vec.with_label_values(&[*side]).get())
                .sum::<u64>()
        };
        MetricsSnapshot {
            ticks: TICKS_TOTAL.get(),
            trade_ticks: TRADE_DECISIONS_TOTAL.with_label_values(&["trade"]).get(),
            no_trade_ticks: TRADE_DECISIONS_TOTAL.with_label_values(&["no_trade"]).get(),
            orders_submitted: sum_sides(&*ORDERS_SUBMITTED_TOTAL),
            risk_rejections: sum_sides(&*RISK_REJECTIONS_TOTAL),
            inactive_clears: INACTIVE_CLEARS_TOTAL.get(),
            last_ratio: IMBALANCE_RATIO.get(),
        }
    }
}
