//! # Validation Module
//!
//! Input validation for dashboard requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request body (serde)                                         │
//! │  ├── Type checks (numbers are numbers, enums are known values)         │
//! │  └── Every field optional so missing ones can be reported together     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── RequiredFields: all missing names in one error                    │
//! │  └── Range and format rules                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL and CHECK constraints                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use busdesk_core::validation::RequiredFields;
//!
//! let mut required = RequiredFields::default();
//! let name = required.text("customerName", Some("Rahim".to_string()));
//! let amount: Option<f64> = required.take("amount", None);
//! let trip = required.text("tripName", Some("  ".to_string()));
//!
//! assert!(name.is_some() && amount.is_none() && trip.is_none());
//! assert_eq!(
//!     required.into_error().to_string(),
//!     "Missing required fields: amount, tripName"
//! );
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_SEARCH_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Required Fields
// =============================================================================

/// Collects the names of missing fields while the values are extracted.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    /// Passes a value through, recording `field` when it is `None`.
    pub fn take<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(field.to_string());
        }
        value
    }

    /// Like [`RequiredFields::take`] but also treats blank strings as
    /// missing. Returns the trimmed text.
    pub fn text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self.take(field, value)
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::MissingFields {
            fields: self.missing,
        }
    }

    pub fn finish(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name such as a stop, trip or customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max` characters
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a ledger search term.
///
/// Empty is allowed and means no search. Returns the trimmed term.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(query.to_string())
}

/// Validates an ISO 4217 currency code and returns it uppercased.
///
/// ```rust
/// use busdesk_core::validation::validate_currency;
///
/// assert_eq!(validate_currency("bdt").unwrap(), "BDT");
/// assert!(validate_currency("taka").is_err());
/// ```
pub fn validate_currency(code: &str) -> ValidationResult<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a three-letter ISO 4217 code".to_string(),
        });
    }
    Ok(code.to_ascii_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be a finite number
/// - Must be within 0..=100
pub fn validate_discount_percent(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discountPercent".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// A fare may be zero (free route promotions) but not negative, and never
/// above [`MAX_AMOUNT`].
pub fn validate_fare_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "fareAmount".to_string(),
        });
    }
    check_amount_ceiling("fareAmount", amount)
}

/// Recorded payments must be strictly positive and at most [`MAX_AMOUNT`].
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    check_amount_ceiling("amount", amount)
}

fn check_amount_ceiling(field: &str, amount: Money) -> ValidationResult<()> {
    if amount > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT.cents() / 100,
        });
    }
    Ok(())
}

/// Distances are optional but, when given, must be positive.
pub fn validate_distance_km(distance: Option<f64>) -> ValidationResult<()> {
    match distance {
        Some(km) if !km.is_finite() || km <= 0.0 => Err(ValidationError::MustBePositive {
            field: "distanceKm".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Date Validators
// =============================================================================

/// Rejects a range whose start is after its end.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ValidationResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::InvalidFormat {
            field: "startDate".to_string(),
            reason: "must not be after endDate".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_collects_in_order() {
        let mut required = RequiredFields::default();
        assert_eq!(required.text("customerName", Some(" Rahim ".into())).as_deref(), Some("Rahim"));
        assert_eq!(required.take::<Money>("amount", None), None);
        assert_eq!(required.text("tripName", Some(String::new())), None);
        assert_eq!(required.take("busName", Some("Bus 12")), Some("Bus 12"));

        assert_eq!(required.missing(), ["amount", "tripName"]);
        let err = required.finish().unwrap_err();
        assert!(err.to_string().contains("amount"));
        assert!(err.to_string().contains("tripName"));
    }

    #[test]
    fn test_required_fields_passes_when_complete() {
        let mut required = RequiredFields::default();
        required.text("name", Some("Dhaka".into()));
        assert!(required.finish().is_ok());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Sylhet ", 100).unwrap(), "Sylhet");
        assert!(validate_name("name", "   ", 100).is_err());
        assert!(validate_name("name", &"A".repeat(101), 100).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  karim ").unwrap(), "karim");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_discount_percent() {
        assert!(validate_discount_percent(0.0).is_ok());
        assert!(validate_discount_percent(12.5).is_ok());
        assert!(validate_discount_percent(100.0).is_ok());

        assert!(validate_discount_percent(-0.5).is_err());
        assert!(validate_discount_percent(100.01).is_err());
        assert!(validate_discount_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_fare_amount(Money::zero()).is_ok());
        assert!(validate_fare_amount(Money::from_cents(-1)).is_err());

        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
    }

    #[test]
    fn test_amounts_are_capped() {
        assert!(validate_payment_amount(MAX_AMOUNT).is_ok());
        assert!(validate_fare_amount(MAX_AMOUNT).is_ok());

        // 1e17 saturates the cents conversion; it must still be rejected
        let huge = Money::from_decimal(1e17);
        assert_eq!(
            validate_payment_amount(huge).unwrap_err().fields(),
            vec!["amount".to_string()]
        );
        assert_eq!(
            validate_fare_amount(huge).unwrap_err().fields(),
            vec!["fareAmount".to_string()]
        );
        assert!(validate_payment_amount(Money::from_cents(MAX_AMOUNT.cents() + 1)).is_err());
    }

    #[test]
    fn test_validate_distance() {
        assert!(validate_distance_km(None).is_ok());
        assert!(validate_distance_km(Some(244.0)).is_ok());
        assert!(validate_distance_km(Some(0.0)).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day);
        assert!(validate_date_range(d(1), d(2)).is_ok());
        assert!(validate_date_range(d(2), d(2)).is_ok());
        assert!(validate_date_range(None, d(2)).is_ok());
        assert!(validate_date_range(d(3), d(2)).is_err());
    }
}
