//! MBP-1 input records.
//!
//! An [`EventRecord`] is one row of market-by-price data with top-of-book
//! context: the event itself (`action`, `side`, `price`, `size`) plus the best
//! bid and ask prevailing after it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::timestamp::Timestamp;
use crate::error::ParseError;

/// MBP event action.
///
/// Only [`Action::Trade`] can qualify for classification; the remaining
/// variants exist so every MBP-1 action code decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// `A`: order added to the book.
    Add,
    /// `C`: order cancelled.
    Cancel,
    /// `M`: order modified.
    Modify,
    /// `R`: book cleared.
    Clear,
    /// `T`: trade.
    Trade,
    /// `F`: fill of a resting order.
    Fill,
    /// `N`: no action (status or snapshot marker).
    None,
}

impl Action {
    /// Single-character MBP action code.
    pub const fn code(&self) -> char {
        match self {
            Action::Add => 'A',
            Action::Cancel => 'C',
            Action::Modify => 'M',
            Action::Clear => 'R',
            Action::Trade => 'T',
            Action::Fill => 'F',
            Action::None => 'N',
        }
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(Action::Add),
            "C" => Ok(Action::Cancel),
            "M" => Ok(Action::Modify),
            "R" => Ok(Action::Clear),
            "T" => Ok(Action::Trade),
            "F" => Ok(Action::Fill),
            "N" => Ok(Action::None),
            other => Err(ParseError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Book side of an MBP event. Informational for trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// `A`: ask (sell side of the book).
    Ask,
    /// `B`: bid (buy side of the book).
    Bid,
    /// `N`: no side specified.
    None,
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(Side::Ask),
            "B" => Ok(Side::Bid),
            "N" => Ok(Side::None),
            other => Err(ParseError::UnknownSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ask => write!(f, "A"),
            Side::Bid => write!(f, "B"),
            Side::None => write!(f, "N"),
        }
    }
}

/// One MBP-1 market data event.
///
/// Upstream is expected to supply `best_bid_price <= best_ask_price` whenever
/// both are non-zero; this is not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Exchange event timestamp.
    pub ts_event: Timestamp,
    /// What happened.
    pub action: Action,
    /// Book side the event applies to.
    pub side: Side,
    /// Trade or order price.
    pub price: Price,
    /// Trade or order size.
    pub size: u32,
    /// Best bid after the event. Zero if unavailable.
    pub best_bid_price: Price,
    /// Best ask after the event. Zero if unavailable.
    pub best_ask_price: Price,
}

impl EventRecord {
    /// Build a trade event.
    pub fn trade(ts_event: Timestamp, price: Price, size: u32, bid: Price, ask: Price) -> Self {
        Self {
            ts_event,
            action: Action::Trade,
            side: Side::None,
            price,
            size,
            best_bid_price: bid,
            best_ask_price: ask,
        }
    }

    /// Build a non-trade book event (add, cancel, modify, ...).
    pub fn book(
        ts_event: Timestamp,
        action: Action,
        side: Side,
        price: Price,
        size: u32,
        bid: Price,
        ask: Price,
    ) -> Self {
        Self {
            ts_event,
            action,
            side,
            price,
            size,
            best_bid_price: bid,
            best_ask_price: ask,
        }
    }

    /// Returns `true` for trade prints.
    #[inline]
    pub fn is_trade(&self) -> bool {
        self.action == Action::Trade
    }

    /// Returns `true` when both sides of the top of book are populated.
    #[inline]
    pub fn has_two_sided_quote(&self) -> bool {
        !self.best_bid_price.is_zero() && !self.best_ask_price.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes_roundtrip_through_display() {
        for code in ["A", "C", "M", "R", "T", "F", "N"] {
            let action: Action = code.parse().unwrap();
            assert_eq!(action.to_string(), code);
        }
    }

    #[test]
    fn test_action_unknown() {
        let err = "X".parse::<Action>().unwrap_err();
        assert_eq!(err, ParseError::UnknownAction("X".to_string()));
    }

    #[test]
    fn test_side_parse() {
        assert_eq!("A".parse::<Side>().unwrap(), Side::Ask);
        assert_eq!(" B ".parse::<Side>().unwrap(), Side::Bid);
        assert_eq!("N".parse::<Side>().unwrap(), Side::None);
        assert!("S".parse::<Side>().is_err());
    }

    #[test]
    fn test_trade_constructor() {
        let ev = EventRecord::trade(
            Timestamp(1),
            Price::from(100.0),
            200,
            Price::from(99.99),
            Price::from(100.01),
        );
        assert!(ev.is_trade());
        assert!(ev.has_two_sided_quote());
        assert_eq!(ev.size, 200);
    }

    #[test]
    fn test_one_sided_quote() {
        let ev = EventRecord::book(
            Timestamp(1),
            Action::Add,
            Side::Bid,
            Price::from(99.99),
            100,
            Price::from(99.99),
            Price::ZERO,
        );
        assert!(!ev.is_trade());
        assert!(!ev.has_two_sided_quote());
    }
}
