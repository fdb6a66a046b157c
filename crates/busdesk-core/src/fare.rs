//! # Fare Engine
//!
//! Route fares and the discount rule applied to them.
//!
//! ```text
//! fareAmount ──► DiscountRate (bps) ──► discountedAmount
//!   450.00          1250 = 12.5%            393.75
//! ```
//!
//! The discounted amount is always derived from `fare_amount` and
//! `discount_percent`; it is never written to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage discount in basis points (1 bps = 0.01%).
///
/// Always within 0..=10000; construction clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DiscountRate(u32);

impl DiscountRate {
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            DiscountRate(Self::MAX_BPS)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a rate from a percentage, clamped to 0..=100.
    ///
    /// NaN is treated as no discount.
    pub fn from_percentage(pct: f64) -> Self {
        if pct.is_nan() {
            return DiscountRate(0);
        }
        DiscountRate((pct.clamp(0.0, 100.0) * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

/// Computes `fare - fare * discount / 100`.
///
/// The result is never negative and never exceeds a non-negative fare.
///
/// ```rust
/// use busdesk_core::fare::{discounted_amount, DiscountRate};
/// use busdesk_core::money::Money;
///
/// let fare = Money::from_cents(45000);
/// let price = discounted_amount(fare, DiscountRate::from_percentage(12.5));
/// assert_eq!(price.cents(), 39375);
/// ```
pub fn discounted_amount(fare: Money, discount: DiscountRate) -> Money {
    let price = fare.apply_percentage_discount(discount.bps());
    if price.is_negative() {
        Money::zero()
    } else {
        price
    }
}

// =============================================================================
// Fare Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum FareStatus {
    #[default]
    Active,
    Inactive,
    /// Applies only during a season (holidays, festivals).
    Seasonal,
}

// =============================================================================
// Fare
// =============================================================================

/// The price of travelling a route for one company.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Fare {
    pub id: String,
    pub company_id: String,
    /// `"{origin} - {destination}"`, produced by the stop resolver.
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    #[ts(type = "number")]
    pub fare_amount: Money,
    /// ISO 4217 code.
    pub currency: String,
    /// 0-100.
    pub discount_percent: f64,
    pub status: FareStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Fare {
    #[inline]
    pub fn discount(&self) -> DiscountRate {
        DiscountRate::from_percentage(self.discount_percent)
    }

    /// Price after the fare's discount.
    pub fn discounted_amount(&self) -> Money {
        discounted_amount(self.fare_amount, self.discount())
    }
}

/// A fare together with its derived price, as listed on the dashboard.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FareQuote {
    #[serde(flatten)]
    pub fare: Fare,
    #[ts(type = "number")]
    pub discounted_amount: Money,
}

impl From<Fare> for FareQuote {
    fn from(fare: Fare) -> Self {
        let discounted_amount = fare.discounted_amount();
        FareQuote {
            fare,
            discounted_amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
