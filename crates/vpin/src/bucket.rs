//! Equal-volume buckets of classified trade flow.

use serde::Serialize;
use vpin_core::EngineConfigError;

use crate::classifier::Direction;

/// A filled volume bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletedBucket {
    /// `|buy - sell| / (buy + sell)`, or `0.0` when no volume was signed.
    pub imbalance: f64,
    pub buy_volume: u64,
    pub sell_volume: u64,
    /// Total volume, including unclassified trades.
    pub volume: u64,
}

/// Accumulates signed trade volume until `bucket_threshold` is reached.
///
/// A trade that overshoots the threshold completes the bucket with its whole
/// size; the excess is not carried into the next bucket.
#[derive(Debug, Clone)]
pub struct VolumeBucketAccumulator {
    bucket_threshold: u64,
    cum_buy_volume: u64,
    cum_sell_volume: u64,
    volume_in_bucket: u64,
}

impl VolumeBucketAccumulator {
    pub fn new(bucket_threshold: u64) -> Result<Self, EngineConfigError> {
        if bucket_threshold == 0 {
            return Err(EngineConfigError::ZeroBucketThreshold);
        }
        Ok(Self {
            bucket_threshold,
            cum_buy_volume: 0,
            cum_sell_volume: 0,
            volume_in_bucket: 0,
        })
    }

    /// Add one classified trade. Returns the bucket it completed, if any.
    pub fn ingest(&mut self, direction: Direction, size: u32) -> Option<CompletedBucket> {
        let size = u64::from(size);
        match direction {
            Direction::Buy => self.cum_buy_volume = self.cum_buy_volume.saturating_add(size),
            Direction::Sell => self.cum_sell_volume = self.cum_sell_volume.saturating_add(size),
            Direction::Unclassified => {}
        }
        self.volume_in_bucket = self.volume_in_bucket.saturating_add(size);

        if self.volume_in_bucket < self.bucket_threshold {
            return None;
        }

        let bucket = CompletedBucket {
            imbalance: imbalance(self.cum_buy_volume, self.cum_sell_volume),
            buy_volume: self.cum_buy_volume,
            sell_volume: self.cum_sell_volume,
            volume: self.volume_in_bucket,
        };
        self.cum_buy_volume = 0;
        self.cum_sell_volume = 0;
        self.volume_in_bucket = 0;
        Some(bucket)
    }

    /// Volume accumulated in the open bucket. Always below the threshold.
    pub fn volume_in_bucket(&self) -> u64 {
        self.volume_in_bucket
    }

    pub fn buy_volume(&self) -> u64 {
        self.cum_buy_volume
    }

    pub fn sell_volume(&self) -> u64 {
        self.cum_sell_volume
    }
}

fn imbalance(buy: u64, sell: u64) -> f64 {
    let signed = buy as f64 + sell as f64;
    if signed == 0.0 {
        return 0.0;
    }
    buy.abs_diff(sell) as f64 / signed
}
