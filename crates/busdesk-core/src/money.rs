//! # Money Module
//!
//! Provides the `Money` type for fares, ticket prices and ledger totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a day of ledger entries as floats:                             │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents, paisa, ...)                  │
//! │    Every amount is an i64 count of the smallest currency unit.         │
//! │    Sums and subtotals are exact.                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The dashboards send and receive decimal amounts (`"amount": 12.5`).
//! `Money` serializes to and from that decimal form; the conversion happens
//! once at the JSON boundary and everything behind it is integer math.
//!
//! ## Usage
//! ```rust
//! use busdesk_core::money::Money;
//!
//! let fare = Money::from_cents(45000); // 450.00
//! let total = fare + Money::from_cents(5000);
//! assert_eq!(total.to_string(), "500.00");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// - **i64 (signed)**: refunds may be negative
/// - **Single field tuple struct**: zero-cost over i64, stored as INTEGER
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount from a request body, rounding to the
    /// nearest minor unit.
    ///
    /// Only the JSON boundary should call this.
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value as a decimal (for serialization only).
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds, clamping at the i64 bounds instead of overflowing.
    ///
    /// ```rust
    /// use busdesk_core::money::Money;
    ///
    /// let max = Money::from_cents(i64::MAX);
    /// assert_eq!(max.saturating_add(Money::from_cents(1)), max);
    /// ```
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Applies a percentage discount expressed in basis points and returns
    /// the discounted amount.
    ///
    /// The discount is rounded half-up to a whole minor unit
    /// (`(amount * bps + 5000) / 10000`), then subtracted.
    ///
    /// ```rust
    /// use busdesk_core::money::Money;
    ///
    /// let fare = Money::from_cents(10000); // 100.00
    /// assert_eq!(fare.apply_percentage_discount(1000).cents(), 9000); // 10% off
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let discount_amount = (self.0 as i128 * discount_bps as i128 + 5000) / 10000;
        Money::from_cents(self.0 - discount_amount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders with two decimals and no currency symbol; the currency code
/// travels separately on every record.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() {
            return Err(de::Error::custom("amount must be a finite number"));
        }
        Ok(Money::from_decimal(amount))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
