//! Nanosecond-precision event timestamps.
//!
//! [`Timestamp`] wraps a `u64` count of nanoseconds since the Unix epoch, the
//! resolution of the `ts_event` column in MBP-1 data.

use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Returns the raw nanosecond value.
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Parse either integer nanoseconds (`"1704722400000000000"`) or an
    /// RFC 3339 timestamp (`"2024-01-08T14:00:00.123456789Z"`).
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let s = input.trim();
        if let Ok(ns) = s.parse::<u64>() {
            return Ok(Self(ns));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|_| ParseError::InvalidTimestamp(input.to_string()))?;
        dt.timestamp_nanos_opt()
            .and_then(|ns| u64::try_from(ns).ok())
            .map(Self)
            .ok_or_else(|| ParseError::InvalidTimestamp(input.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 / 1_000_000_000;
        let nanos = self.0 % 1_000_000_000;
        write!(f, "{}.{:09}", secs, nanos)
    }
}
