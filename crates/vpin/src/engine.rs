//! Event-by-event VPIN computation.
//!
//! [`OrderFlowEngine`] folds a stream of [`EventRecord`]s into a stream of
//! [`OutputRecord`]s, one for one and in order. Only trades of at least
//! `minimum_trade_size` with a two-sided quote touch classifier or bucket
//! state; every other event carries the latest rolling VPIN forward.

use serde::Serialize;
use tracing::{debug, trace};
use vpin_core::config::EngineConfig;
use vpin_core::types::{EventRecord, OutputRecord, Price};
use vpin_core::EngineConfigError;

use crate::bucket::VolumeBucketAccumulator;
use crate::classifier::{Direction, TradeClassifier};
use crate::rolling::RollingAverager;

/// Running counters over everything the engine has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Input events, qualifying or not.
    pub events: u64,
    /// Trades that were classified and bucketed.
    pub qualifying_trades: u64,
    pub buy_trades: u64,
    pub sell_trades: u64,
    pub unclassified_trades: u64,
    pub buckets_completed: u64,
    /// Size-qualifying trades dropped for a zero bid or ask.
    pub degenerate_skipped: u64,
}

/// Streaming VPIN engine.
///
/// # Example
///
/// ```
/// use vpin_core::config::EngineConfig;
/// use vpin_core::types::{EventRecord, Price, Timestamp};
/// use vpin_engine::OrderFlowEngine;
///
/// let config = EngineConfig {
///     bucket_threshold: 100,
///     rolling_window: 5,
///     minimum_trade_size: 1,
///     ..EngineConfig::default()
/// };
/// let mut engine = OrderFlowEngine::new(config).unwrap();
///
/// let trade = EventRecord::trade(
///     Timestamp(1),
///     Price::from(10.02),
///     100,
///     Price::from(10.00),
///     Price::from(10.02),
/// );
/// let out = engine.process(&trade);
/// assert_eq!(out.rolling_vpin, Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct OrderFlowEngine {
    config: EngineConfig,
    classifier: TradeClassifier,
    buckets: VolumeBucketAccumulator,
    rolling: RollingAverager,
    last_rolling: Option<f64>,
    stats: EngineStats,
}

impl OrderFlowEngine {
    /// Build an engine, rejecting a zero bucket threshold or window.
    pub fn new(config: EngineConfig) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self {
            classifier: TradeClassifier::new(config.classification_method),
            buckets: VolumeBucketAccumulator::new(config.bucket_threshold)?,
            rolling: RollingAverager::new(config.rolling_window)?,
            last_rolling: None,
            stats: EngineStats::default(),
            config,
        })
    }

    /// Process one event and produce its output row.
    pub fn process(&mut self, event: &EventRecord) -> OutputRecord {
        self.stats.events += 1;

        let trade_price = if self.qualifies(event) {
            self.apply_trade(event);
            Some(event.price)
        } else {
            None
        };

        OutputRecord {
            ts_event: event.ts_event,
            rolling_vpin: self.last_rolling,
            trade_price,
            best_bid_price: event.best_bid_price,
            best_ask_price: event.best_ask_price,
        }
    }

    /// Process a whole sequence, collecting one output per input.
    pub fn run<'a, I>(&mut self, events: I) -> Vec<OutputRecord>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        events.into_iter().map(|ev| self.process(ev)).collect()
    }

    fn qualifies(&mut self, event: &EventRecord) -> bool {
        if !event.is_trade() || event.size < self.config.minimum_trade_size {
            return false;
        }
        if !event.has_two_sided_quote() {
            self.stats.degenerate_skipped += 1;
            debug!(
                ts_event = event.ts_event.as_nanos(),
                price = %event.price,
                bid = %event.best_bid_price,
                ask = %event.best_ask_price,
                "skipping trade without a two-sided quote"
            );
            return false;
        }
        true
    }

    fn apply_trade(&mut self, event: &EventRecord) {
        let trade = self.classifier.classify_trade(event);
        self.stats.qualifying_trades += 1;
        match trade.direction {
            Direction::Buy => self.stats.buy_trades += 1,
            Direction::Sell => self.stats.sell_trades += 1,
            Direction::Unclassified => self.stats.unclassified_trades += 1,
        }

        if let Some(bucket) = self.buckets.ingest(trade.direction, trade.size) {
            self.last_rolling = self.rolling.push(bucket.imbalance);
            self.stats.buckets_completed += 1;
            trace!(
                bucket = self.stats.buckets_completed,
                imbalance = bucket.imbalance,
                buy = bucket.buy_volume,
                sell = bucket.sell_volume,
                volume = bucket.volume,
                rolling_vpin = self.last_rolling,
                "volume bucket completed"
            );
        }
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Latest rolling VPIN, `None` until the first bucket completes.
    pub fn rolling_vpin(&self) -> Option<f64> {
        self.last_rolling
    }

    /// Volume in the open, incomplete bucket.
    pub fn volume_in_bucket(&self) -> u64 {
        self.buckets.volume_in_bucket()
    }

    /// Number of completed buckets.
    pub fn bucket_count(&self) -> usize {
        self.rolling.len()
    }

    /// Imbalance of every completed bucket, oldest first.
    pub fn bucket_history(&self) -> &[f64] {
        self.rolling.history()
    }

    pub fn last_trade_price(&self) -> Option<Price> {
        self.classifier.last_trade_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpin_core::types::{Action, Side, Timestamp};

    fn config(threshold: u64, window: usize) -> EngineConfig {
        EngineConfig {
            bucket_threshold: threshold,
            rolling_window: window,
            minimum_trade_size: 1,
            ..EngineConfig::default()
        }
    }

    fn trade(price: f64, size: u32) -> EventRecord {
        EventRecord::trade(Timestamp(0), Price::from(price), size, Price::from(10.00), Price::from(10.02))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert_eq!(
            OrderFlowEngine::new(config(0, 5)).unwrap_err(),
            EngineConfigError::ZeroBucketThreshold
        );
        assert_eq!(
            OrderFlowEngine::new(config(100, 0)).unwrap_err(),
            EngineConfigError::ZeroRollingWindow
        );
    }

    #[test]
    fn test_default_minimum_trade_size_filters() {
        let mut engine = OrderFlowEngine::new(EngineConfig::default()).unwrap();
        let out = engine.process(&trade(10.02, 99));
        assert!(out.trade_price.is_none());
        assert_eq!(engine.volume_in_bucket(), 0);

        let out = engine.process(&trade(10.02, 100));
        assert_eq!(out.trade_price, Some(Price::from(10.02)));
        assert_eq!(engine.volume_in_bucket(), 100);
    }

    #[test]
    fn test_rolling_none_until_first_bucket() {
        let mut engine = OrderFlowEngine::new(config(100, 5)).unwrap();
        let out = engine.process(&trade(10.02, 50));
        assert!(out.rolling_vpin.is_none());
        assert!(out.trade_price.is_some());

        let out = engine.process(&trade(10.00, 50));
        assert_eq!(out.rolling_vpin, Some(0.0));
        assert_eq!(engine.bucket_count(), 1);
    }

    #[test]
    fn test_non_trade_carries_rolling_forward() {
        let mut engine = OrderFlowEngine::new(config(100, 5)).unwrap();
        engine.process(&trade(10.02, 100));
        let add = EventRecord::book(
            Timestamp(7),
            Action::Add,
            Side::Bid,
            Price::from(10.01),
            5,
            Price::from(10.01),
            Price::from(10.02),
        );
        let out = engine.process(&add);
        assert_eq!(out.rolling_vpin, Some(1.0));
        assert!(out.trade_price.is_none());
        assert_eq!(out.ts_event, Timestamp(7));
        assert_eq!(out.best_bid_price, Price::from(10.01));
    }

    #[test]
    fn test_degenerate_quote_is_skipped() {
        let mut engine = OrderFlowEngine::new(config(100, 5)).unwrap();
        engine.process(&trade(10.01, 10));
        let before = engine.last_trade_price();

        let zero_bid =
            EventRecord::trade(Timestamp(1), Price::from(10.05), 50, Price::ZERO, Price::from(10.02));
        let out = engine.process(&zero_bid);
        assert!(out.trade_price.is_none());
        assert_eq!(engine.volume_in_bucket(), 10);
        assert_eq!(engine.last_trade_price(), before);
        assert_eq!(engine.stats().degenerate_skipped, 1);

        let zero_ask =
            EventRecord::trade(Timestamp(2), Price::from(10.05), 50, Price::from(10.00), Price::ZERO);
        engine.process(&zero_ask);
        assert_eq!(engine.stats().degenerate_skipped, 2);
        assert_eq!(engine.stats().qualifying_trades, 1);
    }

    #[test]
    fn test_undersized_degenerate_not_counted() {
        let mut engine = OrderFlowEngine::new(EngineConfig::default()).unwrap();
        let ev = EventRecord::trade(Timestamp(1), Price::from(1.0), 5, Price::ZERO, Price::ZERO);
        engine.process(&ev);
        assert_eq!(engine.stats().degenerate_skipped, 0);
    }

    #[test]
    fn test_stats_counts() {
        let mut engine = OrderFlowEngine::new(config(1_000, 5)).unwrap();
        engine.run(&[trade(10.02, 10), trade(10.00, 10), trade(10.01, 10)]);
        let stats = engine.stats();
        assert_eq!(stats.events, 3);
        assert_eq!(stats.qualifying_trades, 3);
        // 10.01 is at the mid and an uptick from 10.00.
        assert_eq!(stats.buy_trades, 2);
        assert_eq!(stats.sell_trades, 1);
        assert_eq!(stats.unclassified_trades, 0);
        assert_eq!(stats.buckets_completed, 0);
    }

    #[test]
    fn test_volume_stays_below_threshold() {
        let mut engine = OrderFlowEngine::new(config(100, 5)).unwrap();
        for size in [30, 90, 250, 1, 99, 100] {
            engine.process(&trade(10.02, size));
            assert!(engine.volume_in_bucket() < 100);
        }
    }
}
