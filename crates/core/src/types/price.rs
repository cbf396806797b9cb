//! Fixed-point price type.
//!
//! [`Price`] stores a signed count of nano-units (`10^-9`), the fixed-price
//! convention of Databento MBP-1 feeds: `Price::from_raw(240_510_000_000)`
//! represents `240.51`. Decimal text is parsed exactly, without going through
//! `f64`, so equality against a quote midpoint is never lost to rounding.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Number of decimal places carried by [`Price`].
pub const PRICE_SCALE: u8 = 9;

/// Nano-units per whole price unit.
const UNITS_PER_WHOLE: i64 = 1_000_000_000;

/// Raw sentinel Databento writes for an undefined price.
pub const UNDEF_RAW_PRICE: i64 = i64::MAX;

/// Fixed-point price: `value = raw * 10^-9`.
///
/// A zero price on a quote field means "unavailable".
///
/// # Examples
///
/// ```
/// use vpin_core::types::Price;
///
/// let px = Price::parse_decimal("240.51").unwrap();
/// assert_eq!(px.raw(), 240_510_000_000);
/// assert_eq!(px.to_string(), "240.510000000");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// The zero price ("unavailable" on quote fields).
    pub const ZERO: Price = Price(0);

    /// Create a price from raw nano-units.
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw nano-unit count.
    #[inline]
    pub const fn raw(&self) -> i64 {
        self.0
    }

    /// Returns `true` if this price is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert to `f64`. Display and export only.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / UNITS_PER_WHOLE as f64
    }

    /// Compare this price against the midpoint of `bid` and `ask` exactly.
    ///
    /// Evaluates `2 * self` against `bid + ask` in 128-bit arithmetic, so an
    /// odd nano-unit spread does not truncate the midpoint onto a trade price.
    #[inline]
    pub fn cmp_to_mid(self, bid: Price, ask: Price) -> Ordering {
        (2 * self.0 as i128).cmp(&(bid.0 as i128 + ask.0 as i128))
    }

    /// Parse decimal text such as `"240.510000000"`, `"-0.5"` or `"12"`.
    ///
    /// At most nine significant decimal places are accepted; trailing zeros
    /// beyond that are ignored.
    pub fn parse_decimal(input: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &'static str| ParseError::InvalidPrice {
            input: input.to_string(),
            reason,
        };
        let overflow = || ParseError::PriceOverflow(input.to_string());

        let s = input.trim();
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            Some(_) => (false, s),
            None => return Err(invalid("empty")),
        };

        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("unexpected character"));
        }

        let scale = PRICE_SCALE as usize;
        let (frac, excess) = frac.split_at(frac.len().min(scale));
        if excess.bytes().any(|b| b != b'0') {
            return Err(invalid("more than nine decimal places"));
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac_units: i64 = if frac.is_empty() {
            0
        } else {
            // At most nine digits, always fits.
            frac.parse::<i64>().map_err(|_| invalid("bad fraction"))?
                * 10i64.pow((scale - frac.len()) as u32)
        };

        let magnitude = whole_units
            .checked_mul(UNITS_PER_WHOLE)
            .and_then(|v| v.checked_add(frac_units))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Parse raw nano-unit integer text such as `"240510000000"`.
    ///
    /// The undefined-price sentinel decodes to [`Price::ZERO`].
    pub fn parse_raw(input: &str) -> Result<Self, ParseError> {
        let raw: i64 = input
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidPrice {
                input: input.to_string(),
                reason: "not an integer",
            })?;
        if raw == UNDEF_RAW_PRICE {
            return Ok(Self::ZERO);
        }
        Ok(Self(raw))
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_whole = UNITS_PER_WHOLE as u64;
        write!(
            f,
            "{}{}.{:0>width$}",
            sign,
            abs / per_whole,
            abs % per_whole,
            width = PRICE_SCALE as usize
        )
    }
}

impl From<f64> for Price {
    /// Round an `f64` to the nearest nano-unit. Tests and configuration only.
    fn from(value: f64) -> Self {
        Self((value * UNITS_PER_WHOLE as f64).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_pretty_px() {
        let p = Price::parse_decimal("240.510000000").unwrap();
        assert_eq!(p.raw(), 240_510_000_000);
    }

    #[test]
    fn test_parse_decimal_short_fraction() {
        assert_eq!(Price::parse_decimal("240.5").unwrap().raw(), 240_500_000_000);
        assert_eq!(Price::parse_decimal(".25").unwrap().raw(), 250_000_000);
        assert_eq!(Price::parse_decimal("7.").unwrap().raw(), 7_000_000_000);
    }

    #[test]
    fn test_parse_decimal_integer() {
        assert_eq!(Price::parse_decimal("12").unwrap().raw(), 12_000_000_000);
    }

    #[test]
    fn test_parse_decimal_negative() {
        assert_eq!(Price::parse_decimal("-0.5").unwrap().raw(), -500_000_000);
        assert_eq!(Price::parse_decimal("+3").unwrap().raw(), 3_000_000_000);
    }

    #[test]
    fn test_parse_decimal_trailing_zeros_beyond_scale() {
        let p = Price::parse_decimal("1.0000000010000").unwrap();
        assert_eq!(p.raw(), 1_000_000_001);
    }

    #[test]
    fn test_parse_decimal_too_precise() {
        let err = Price::parse_decimal("1.0000000001").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPrice { .. }));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Price::parse_decimal("").is_err());
        assert!(Price::parse_decimal("-").is_err());
        assert!(Price::parse_decimal(".").is_err());
        assert!(Price::parse_decimal("1e5").is_err());
        assert!(Price::parse_decimal("12.3.4").is_err());
    }

    #[test]
    fn test_parse_decimal_overflow() {
        let err = Price::parse_decimal("99999999999999999999").unwrap_err();
        assert!(matches!(err, ParseError::PriceOverflow(_)));
        assert!(Price::parse_decimal("9300000000").is_err());
    }

    #[test]
    fn test_parse_raw() {
        assert_eq!(Price::parse_raw("240510000000").unwrap().raw(), 240_510_000_000);
        assert!(Price::parse_raw("240.51").is_err());
    }

    #[test]
    fn test_parse_raw_undefined_is_zero() {
        let p = Price::parse_raw("9223372036854775807").unwrap();
        assert!(p.is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_raw(240_510_000_000).to_string(), "240.510000000");
        assert_eq!(Price::from_raw(1).to_string(), "0.000000001");
        assert_eq!(Price::from_raw(-500_000_000).to_string(), "-0.500000000");
        assert_eq!(Price::ZERO.to_string(), "0.000000000");
    }

    #[test]
    fn test_cmp_to_mid() {
        let bid = Price::from(100.00);
        let ask = Price::from(100.02);
        assert_eq!(Price::from(100.02).cmp_to_mid(bid, ask), Ordering::Greater);
        assert_eq!(Price::from(100.00).cmp_to_mid(bid, ask), Ordering::Less);
        assert_eq!(Price::from(100.01).cmp_to_mid(bid, ask), Ordering::Equal);
    }

    #[test]
    fn test_cmp_to_mid_odd_spread_is_exact() {
        // Midpoint is 1.5 nano-units; truncating division would make it 1.
        let bid = Price::from_raw(1);
        let ask = Price::from_raw(2);
        assert_eq!(Price::from_raw(1).cmp_to_mid(bid, ask), Ordering::Less);
        assert_eq!(Price::from_raw(2).cmp_to_mid(bid, ask), Ordering::Greater);
    }

    #[test]
    fn test_cmp_to_mid_no_overflow_near_max() {
        let big = Price::from_raw(i64::MAX - 1);
        assert_eq!(big.cmp_to_mid(big, big), Ordering::Equal);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Price::from(240.51).raw(), 240_510_000_000);
        assert!(Price::from(0.0).is_zero());
    }

    #[test]
    fn test_ord() {
        assert!(Price::from(1.5) > Price::from(1.25));
        assert!(Price::from(-1.0) < Price::ZERO);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Price::from_raw(42)).unwrap();
        assert_eq!(json, "42");
        let back: Price = serde_json::from_str("42").unwrap();
        assert_eq!(back, Price::from_raw(42));
    }
}
