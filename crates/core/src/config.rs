//! Layered configuration for the VPIN workspace.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (bucket of 10 000 shares, 20-bucket window,
//!    100-share minimum trade)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `VPIN_`, nested with `__`)
//!
//! Command-line flags are applied on top by the binary, after which
//! [`AppConfig::validate`] must pass before an engine is built.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::EngineConfigError;

// ── Default value functions ────────────────────────────────────────────

/// Default volume per bucket: 10 000.
fn default_bucket_threshold() -> u64 {
    10_000
}

/// Default rolling window: 20 buckets.
fn default_rolling_window() -> usize {
    20
}

/// Default minimum qualifying trade size: 100.
fn default_minimum_trade_size() -> u32 {
    100
}

/// Default producer-to-engine channel capacity: 4 096 events.
fn default_channel_capacity() -> usize {
    4_096
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// VPIN computation parameters.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Staged ingest pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Toxicity alerting.
    #[serde(default)]
    pub alert: AlertConfig,
    /// Log output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of the streaming VPIN computation. Immutable once an engine is
/// built from them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Trade volume that completes one bucket.
    #[serde(default = "default_bucket_threshold")]
    pub bucket_threshold: u64,
    /// Number of most recent buckets averaged into the rolling value.
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    /// Trades smaller than this are ignored.
    #[serde(default = "default_minimum_trade_size")]
    pub minimum_trade_size: u32,
    /// Trade classification rule.
    #[serde(default)]
    pub classification_method: ClassificationMethod,
}

/// How trades are assigned a buy/sell direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Compare against the quote midpoint; ties fall back to the last trade
    /// price.
    #[default]
    Midpoint,
    /// Tick test against the last trade price only.
    LastTrade,
    /// Quote rule: at or through the ask is a buy, at or through the bid a
    /// sell, strictly inside the spread is unclassified.
    BidAsk,
}

/// Staged ingest pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Decode input on a separate producer thread.
    #[serde(default)]
    pub enabled: bool,
    /// Bounded channel capacity between producer and engine.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// Toxicity alert configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertConfig {
    /// Rolling VPIN level in `(0, 1]` at which flow is flagged toxic.
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of pretty output.
    #[serde(default)]
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_threshold: default_bucket_threshold(),
            rolling_window: default_rolling_window(),
            minimum_trade_size: default_minimum_trade_size(),
            classification_method: ClassificationMethod::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl EngineConfig {
    /// Check the engine invariants: positive bucket threshold and window.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.bucket_threshold == 0 {
            return Err(EngineConfigError::ZeroBucketThreshold);
        }
        if self.rolling_window == 0 {
            return Err(EngineConfigError::ZeroRollingWindow);
        }
        Ok(())
    }
}

impl AlertConfig {
    /// Check that a configured threshold lies in `(0, 1]`.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        match self.threshold {
            Some(t) if !(t > 0.0 && t <= 1.0) => Err(EngineConfigError::AlertThreshold(t)),
            _ => Ok(()),
        }
    }
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `VPIN_` and `__` as the
    ///    nesting separator (e.g., `VPIN_ENGINE__BUCKET_THRESHOLD=5000`).
    ///
    /// The result is validated before it is returned.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("engine.bucket_threshold", default_bucket_threshold() as i64)?
            .set_default("engine.rolling_window", default_rolling_window() as i64)?
            .set_default("engine.minimum_trade_size", i64::from(default_minimum_trade_size()))?
            .set_default("engine.classification_method", "midpoint")?
            .set_default("pipeline.enabled", false)?
            .set_default("pipeline.channel_capacity", default_channel_capacity() as i64)?
            .set_default("logging.json", false)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (VPIN_ prefix) ─────────────
        // The prefix separator is set to `_` explicitly; otherwise the
        // `config` crate reuses the `__` nesting separator after the prefix.
        builder = builder.add_source(
            Environment::with_prefix("VPIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate every section. Call again after applying CLI overrides.
    pub fn validate(&self) -> Result<()> {
        self.engine
            .validate()
            .context("invalid [engine] configuration")?;
        self.alert.validate().context("invalid [alert] configuration")?;
        Ok(())
    }
}
