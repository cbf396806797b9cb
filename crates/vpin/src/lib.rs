//! # vpin-engine
//!
//! Streaming Volume-Synchronized Probability of Informed Trading.
//!
//! Events flow through three stages, all owned by [`OrderFlowEngine`]:
//!
//! 1. [`TradeClassifier`] signs each qualifying trade as buy, sell, or
//!    unclassified.
//! 2. [`VolumeBucketAccumulator`] sums signed volume into fixed-size buckets
//!    and emits an order-flow imbalance when a bucket fills.
//! 3. [`RollingAverager`] smooths the imbalances over a trailing window.
//!
//! Every input event yields exactly one [`OutputRecord`](vpin_core::types::OutputRecord).
//! [`ToxicityMonitor`] and [`pipeline::run_pipelined`] sit around the engine
//! for alerting and threaded ingest.

pub mod alert;
pub mod bucket;
pub mod classifier;
pub mod engine;
pub mod pipeline;
pub mod rolling;

pub use alert::{ToxicityMonitor, ToxicityTransition};
pub use bucket::{CompletedBucket, VolumeBucketAccumulator};
pub use classifier::{ClassifiedTrade, Direction, TradeClassifier};
pub use engine::{EngineStats, OrderFlowEngine};
pub use pipeline::{run_pipelined, PipelineError};
pub use rolling::RollingAverager;
