//! # Money Module
//!
//! Provides the `Money` type for sale and cost prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Stored and compared as i64 cents. The dashboard speaks decimal       │
//! │    numbers (12.5), so conversion happens once, at the JSON boundary,   │
//! │    rounding to the nearest cent.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! assert_eq!(price.to_decimal(), 10.99);
//!
//! let parsed = Money::from_decimal(12.5).unwrap();
//! assert_eq!(parsed.cents(), 1250);
//! ```

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Largest magnitude accepted from a decimal, in cents.
///
/// Beyond 2^53 an f64 can no longer represent every integer, so the
/// conversion would silently lose cents.
const MAX_DECIMAL_CENTS: f64 = 9_007_199_254_740_992.0;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Arithmetic results may go negative (e.g. margins)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No serde derive**: the wire format is decimal, see [`decimal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount in major units (12.5 = $12.50) to Money,
    /// rounding half away from zero to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities, and values too large to convert
    /// without losing cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
    /// assert_eq!(Money::from_decimal(2.345).unwrap().cents(), 235);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        // Go through the shortest decimal representation so that 2.345
        // (stored as 2.34499999...) still rounds the way a person expects.
        let scaled: f64 = format!("{}e2", amount).parse().ok()?;
        let cents = scaled.round();

        if cents.abs() > MAX_DECIMAL_CENTS {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal in major units, for the wire.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation for logs.
///
/// ## Note
/// The dashboard formats prices itself to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a stock quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Decimal Wire Format
// =============================================================================

/// Serde adapter that reads and writes Money as a decimal JSON number.
///
/// ```rust,ignore
/// #[serde(with = "stockroom_core::money::decimal")]
/// pub sale_price: Money,
/// ```
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .ok_or_else(|| de::Error::custom("amount is not a representable number"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(12.5).unwrap().cents(), 1250);
        assert_eq!(Money::from_decimal(0.005).unwrap().cents(), 1);
        assert_eq!(Money::from_decimal(1.004).unwrap().cents(), 100);
        assert_eq!(Money::from_decimal(19.99).unwrap().cents(), 1999);
        assert_eq!(Money::from_decimal(-3.2).unwrap().cents(), -320);
    }

    #[test]
    fn test_from_decimal_rejects_unrepresentable() {
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(1e300).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_arithmetic() {
        let sale = Money::from_cents(250);
        let cost = Money::from_cents(120);
        assert_eq!((sale - cost).cents(), 130);
        assert_eq!((sale + cost).cents(), 370);
        assert_eq!((cost * 3).cents(), 360);
    }

    #[test]
    fn test_decimal_serde_adapter() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Priced {
            #[serde(with = "decimal")]
            price: Money,
        }

        let json = serde_json::to_string(&Priced {
            price: Money::from_cents(1250),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":12.5}"#);

        let back: Priced = serde_json::from_str(r#"{"price":3}"#).unwrap();
        assert_eq!(back.price.cents(), 300);
    }
}
