//! # vpin-core
//!
//! Shared types, error definitions, configuration, and logging for the VPIN
//! order-flow workspace.
//!
//! Everything the streaming engine and the replay shell agree on lives here:
//! fixed-point prices, nanosecond timestamps, the MBP-1 [`types::EventRecord`]
//! input model, the [`types::OutputRecord`] series row, the layered
//! [`config::AppConfig`], and [`logging::init_tracing`].

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{EngineConfigError, ParseError};
