//! Core types for the VPIN workspace.
//!
//! Prices are fixed-point nano-units so that midpoint ties are detected
//! exactly; timestamps are raw nanoseconds.

pub mod event;
pub mod output;
pub mod price;
pub mod timestamp;

// Re-export primary types for convenient access via `vpin_core::types::*`.
pub use event::{Action, EventRecord, Side};
pub use output::OutputRecord;
pub use price::{Price, PRICE_SCALE, UNDEF_RAW_PRICE};
pub use timestamp::Timestamp;
