//! # vpin-replay
//!
//! File-backed driver for the VPIN engine: decodes Databento MBP-1 CSV
//! (optionally gzipped), runs it through
//! [`OrderFlowEngine`](vpin_engine::OrderFlowEngine), and writes one output
//! CSV row per input row.

pub mod replay;
pub mod sink;
pub mod source;

pub use replay::{replay, ReplaySummary};
pub use sink::OutputCsvWriter;
pub use source::{DecodeError, MbpCsvReader, PriceFormat};
