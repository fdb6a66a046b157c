//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Busdesk                                │
//! │                                                                         │
//! │  Dashboard                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  POST /bus/trips                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule broken? ─── CoreError::ScheduleConflict ── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── 409 { "success": false, "code": "CONFLICT", "error": "..." }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with full detail and reach the client only
//! as a generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use busdesk_core::{CoreError, ValidationError};
use busdesk_db::DbError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or expired bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated, but the role may not use the vendor dashboard.
    #[error("Forbidden")]
    Forbidden,

    /// Request failed validation. `fields` names the offending inputs.
    #[error("{message}")]
    Validation { message: String, fields: Vec<String> },

    #[error("{0}")]
    NotFound(String),

    /// The change collides with existing data (double booking, duplicate name).
    #[error("{0}")]
    Conflict(String),

    /// Anything the client cannot fix. Detail is logged, never returned.
    #[error("Internal server error")]
    Internal,
}

/// Error codes for API responses.
///
/// ## Usage in the Dashboard
/// ```typescript
/// if (!res.ok) {
///   const body = await res.json();
///   switch (body.code) {
///     case 'VALIDATION_ERROR':
///       highlight(body.fields);
///       break;
///     case 'CONFLICT':
///       showNotification(body.error);
///       break;
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    ValidationError,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    code: ErrorCode,
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::NotFound(format!("{} not found: {}", resource, id))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Unauthorized => ErrorCode::Unauthorized,
            ApiError::Forbidden => ErrorCode::Forbidden,
            ApiError::Validation { .. } => ErrorCode::ValidationError,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Conflict(_) => ErrorCode::Conflict,
            ApiError::Internal => ErrorCode::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Dashboards check for exactly this body to redirect to login
        if let ApiError::Unauthorized = self {
            return (status, Json(json!({ "error": "Unauthorized" }))).into_response();
        }

        let code = self.code();
        let error = self.to_string();
        let fields = match self {
            ApiError::Validation { fields, .. } => fields,
            _ => Vec::new(),
        };

        let body = ErrorBody {
            success: false,
            code,
            error,
            fields,
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            fields: err.fields(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::UnknownStop { .. } => ApiError::validation(err.to_string()),
            CoreError::SameOriginDestination(_) => ApiError::Validation {
                message: err.to_string(),
                fields: vec!["destination".to_string()],
            },
            CoreError::ScheduleConflict { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::Conflict(format!("{} '{}' already exists", field, value))
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Database operation failed");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(format!("Invalid path: {}", rejection.body_text()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use busdesk_core::Weekday;

    #[test]
    fn test_missing_fields_become_400_with_field_list() {
        let err: ApiError = ValidationError::MissingFields {
            fields: vec!["amount".to_string(), "tripName".to_string()],
        }
        .into();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        match err {
            ApiError::Validation { fields, .. } => assert_eq!(fields, vec!["amount", "tripName"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schedule_conflict_is_409() {
        let err: ApiError = CoreError::ScheduleConflict {
            bus_id: "b-1".to_string(),
            trip_name: "Morning Express".to_string(),
            days: vec![Weekday::Monday],
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("Morning Express"));
    }

    #[test]
    fn test_query_failure_hides_detail() {
        let err: ApiError = DbError::QueryFailed("no such column: secret".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let err: ApiError = DbError::duplicate("name", "Dhaka").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
