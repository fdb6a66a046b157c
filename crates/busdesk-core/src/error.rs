//! # Error Types
//!
//! Domain-specific error types for busdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  busdesk-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  busdesk-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What the dashboard sees (status + JSON)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::trip::Weekday;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or both stop names of a route do not match a known stop.
    ///
    /// ## When This Occurs
    /// - Fare or route form submitted with a typo in the origin/destination
    /// - Stop renamed after the form was loaded
    #[error("Unknown stop: {}", .names.join(", "))]
    UnknownStop { names: Vec<String> },

    /// Origin and destination are the same stop.
    #[error("Origin and destination must differ: {0}")]
    SameOriginDestination(String),

    /// The bus already runs another trip at the same time on a shared day.
    ///
    /// ## User Workflow
    /// ```text
    /// New trip: Bus 12, Mon/Wed 08:00
    ///      │
    ///      ▼
    /// Existing: "Morning Express", Bus 12, Mon/Fri 08:00
    ///      │
    ///      ▼
    /// ScheduleConflict { trip_name: "Morning Express", days: [Monday] }
    /// ```
    #[error("Bus {bus_id} already runs trip '{trip_name}' at the same time on {days:?}")]
    ScheduleConflict {
        bus_id: String,
        trip_name: String,
        days: Vec<Weekday>,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Several required fields are missing; collected in one pass so the
    /// caller can fix them all at once.
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Field names this error refers to.
    pub fn fields(&self) -> Vec<String> {
        match self {
            ValidationError::MissingFields { fields } => fields.clone(),
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => vec![field.clone()],
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_every_field() {
        let err = ValidationError::MissingFields {
            fields: vec!["amount".to_string(), "tripName".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required fields: amount, tripName");
        assert_eq!(err.fields(), vec!["amount", "tripName"]);
    }

    #[test]
    fn test_unknown_stop_message() {
        let err = CoreError::UnknownStop {
            names: vec!["Nowhere".to_string()],
        };
        assert_eq!(err.to_string(), "Unknown stop: Nowhere");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "busId".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
