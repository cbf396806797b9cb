//! Trailing mean over completed-bucket imbalances.

use vpin_core::EngineConfigError;

/// Mean of the last `window` values pushed.
///
/// The full history is retained; only the trailing window is read.
#[derive(Debug, Clone)]
pub struct RollingAverager {
    window: usize,
    history: Vec<f64>,
}

impl RollingAverager {
    pub fn new(window: usize) -> Result<Self, EngineConfigError> {
        if window == 0 {
            return Err(EngineConfigError::ZeroRollingWindow);
        }
        Ok(Self {
            window,
            history: Vec::new(),
        })
    }

    /// Append a value and return the updated mean.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.history.push(value);
        self.current()
    }

    /// Mean of the last `min(len, window)` values, `None` before any push.
    pub fn current(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let start = self.history.len().saturating_sub(self.window);
        let tail = &self.history[start..];
        Some(tail.iter().sum::<f64>() / tail.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Every value pushed, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}
