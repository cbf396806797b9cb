//! Trade direction classification.
//!
//! The default rule is the tick test refined by the quote midpoint: trades
//! above the mid are buyer-initiated, below it seller-initiated, and trades
//! exactly at the mid fall back to the direction of the price change from the
//! previous trade.

use std::cmp::Ordering;

use serde::Serialize;
use vpin_core::config::ClassificationMethod;
use vpin_core::types::{EventRecord, Price};

/// Inferred aggressor side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Buy,
    Sell,
    Unclassified,
}

/// A qualifying trade with its inferred direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedTrade {
    pub direction: Direction,
    pub size: u32,
}

/// Stateful trade classifier.
///
/// Carries the previous classified trade price between calls. That price is
/// replaced after every classification, whatever the outcome.
#[derive(Debug, Clone)]
pub struct TradeClassifier {
    method: ClassificationMethod,
    last_trade_price: Option<Price>,
}

impl TradeClassifier {
    pub fn new(method: ClassificationMethod) -> Self {
        Self {
            method,
            last_trade_price: None,
        }
    }

    /// Classify a trade at `price` against the prevailing quote.
    ///
    /// Callers must ensure `bid` and `ask` are both non-zero.
    pub fn classify(&mut self, price: Price, bid: Price, ask: Price) -> Direction {
        let direction = match self.method {
            ClassificationMethod::Midpoint => match price.cmp_to_mid(bid, ask) {
                Ordering::Greater => Direction::Buy,
                Ordering::Less => Direction::Sell,
                Ordering::Equal => tick_test(price, self.last_trade_price),
            },
            ClassificationMethod::LastTrade => tick_test(price, self.last_trade_price),
            ClassificationMethod::BidAsk => {
                if price >= ask {
                    Direction::Buy
                } else if price <= bid {
                    Direction::Sell
                } else {
                    Direction::Unclassified
                }
            }
        };
        self.last_trade_price = Some(price);
        direction
    }

    /// Classify a trade event, keeping its size.
    pub fn classify_trade(&mut self, event: &EventRecord) -> ClassifiedTrade {
        ClassifiedTrade {
            direction: self.classify(event.price, event.best_bid_price, event.best_ask_price),
            size: event.size,
        }
    }

    /// Price of the previously classified trade, if any.
    pub fn last_trade_price(&self) -> Option<Price> {
        self.last_trade_price
    }
}

/// Uptick is a buy, downtick a sell; zero tick or no prior trade is
/// unclassified.
fn tick_test(price: Price, last: Option<Price>) -> Direction {
    match last.map(|prev| price.cmp(&prev)) {
        Some(Ordering::Greater) => Direction::Buy,
        Some(Ordering::Less) => Direction::Sell,
        Some(Ordering::Equal) | None => Direction::Unclassified,
    }
}
