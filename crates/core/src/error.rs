//! Error types shared across the workspace.

/// Invalid engine configuration, detected at construction time before any
/// event is processed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineConfigError {
    /// `bucket_threshold` was zero.
    #[error("bucket_threshold must be a positive volume")]
    ZeroBucketThreshold,
    /// `rolling_window` was zero.
    #[error("rolling_window must be a positive bucket count")]
    ZeroRollingWindow,
    /// Alert threshold outside `(0, 1]`.
    #[error("alert threshold must be in (0, 1], got {0}")]
    AlertThreshold(f64),
}

/// Failure to decode a single field of a market data record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Price text is not a decimal or integer number.
    #[error("invalid price '{input}': {reason}")]
    InvalidPrice { input: String, reason: &'static str },
    /// Price does not fit the fixed-point representation.
    #[error("price '{0}' overflows the fixed-point range")]
    PriceOverflow(String),
    /// Unknown MBP action code.
    #[error("unknown action code '{0}'")]
    UnknownAction(String),
    /// Unknown MBP side code.
    #[error("unknown side code '{0}'")]
    UnknownSide(String),
    /// Timestamp is neither integer nanoseconds nor RFC 3339.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}
