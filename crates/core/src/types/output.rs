//! Output series rows.

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::timestamp::Timestamp;

/// One output row per input event, in input order.
///
/// `trade_price` and `rolling_vpin` are independent signals: a row can carry a
/// qualifying trade before any bucket has completed (`rolling_vpin == None`),
/// and a non-trade row still carries the latest rolling value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Timestamp of the input event.
    pub ts_event: Timestamp,
    /// Smoothed VPIN; `None` until the first volume bucket completes.
    pub rolling_vpin: Option<f64>,
    /// Trade price when the event was a qualifying trade.
    pub trade_price: Option<Price>,
    /// Best bid forwarded from the input event.
    pub best_bid_price: Price,
    /// Best ask forwarded from the input event.
    pub best_ask_price: Price,
}

impl OutputRecord {
    /// Trade price with the export convention of zero for non-trade rows.
    #[inline]
    pub fn trade_price_or_zero(&self) -> Price {
        self.trade_price.unwrap_or(Price::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_trade_exports_zero_price() {
        let row = OutputRecord {
            ts_event: Timestamp(5),
            rolling_vpin: Some(0.25),
            trade_price: None,
            best_bid_price: Price::from(1.0),
            best_ask_price: Price::from(1.1),
        };
        assert!(row.trade_price.is_none());
        assert!(row.trade_price_or_zero().is_zero());
    }

    #[test]
    fn test_trade_row() {
        let row = OutputRecord {
            ts_event: Timestamp(5),
            rolling_vpin: None,
            trade_price: Some(Price::from(1.05)),
            best_bid_price: Price::from(1.0),
            best_ask_price: Price::from(1.1),
        };
        assert!(row.trade_price.is_some());
        assert_eq!(row.trade_price_or_zero(), Price::from(1.05));
    }
}
