//! Threshold alerts on the rolling VPIN.

use serde::Serialize;
use vpin_core::config::AlertConfig;
use vpin_core::EngineConfigError;

/// A crossing of the toxicity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ToxicityTransition {
    /// Rolling VPIN rose to or above the threshold.
    Entered(f64),
    /// Rolling VPIN fell back below the threshold.
    Cleared(f64),
}

/// Edge-triggered toxicity detector.
///
/// Emits a transition only when the rolling VPIN crosses the threshold, not on
/// every observation above it.
#[derive(Debug, Clone)]
pub struct ToxicityMonitor {
    threshold: f64,
    toxic: bool,
}

impl ToxicityMonitor {
    /// `threshold` must lie in `(0, 1]`.
    pub fn new(threshold: f64) -> Result<Self, EngineConfigError> {
        AlertConfig {
            threshold: Some(threshold),
        }
        .validate()?;
        Ok(Self {
            threshold,
            toxic: false,
        })
    }

    /// Build from configuration; `Ok(None)` when no threshold is set.
    pub fn from_config(config: &AlertConfig) -> Result<Option<Self>, EngineConfigError> {
        config.threshold.map(Self::new).transpose()
    }

    /// Feed the latest rolling VPIN. Absent values never transition.
    pub fn observe(&mut self, rolling_vpin: Option<f64>) -> Option<ToxicityTransition> {
        let value = rolling_vpin?;
        let above = value >= self.threshold;
        if above == self.toxic {
            return None;
        }
        self.toxic = above;
        Some(if above {
            ToxicityTransition::Entered(value)
        } else {
            ToxicityTransition::Cleared(value)
        })
    }

    pub fn is_toxic(&self) -> bool {
        self.toxic
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
