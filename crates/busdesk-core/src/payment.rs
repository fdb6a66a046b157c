//! # Payments
//!
//! Three sources record money coming in, each with its own shape:
//!
//! ```text
//! ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │ BookingRecord    │  │ TicketRecord     │  │ DispatchRecord   │
//! │ online seat sale │  │ walk-in counter  │  │ parcel charge    │
//! │ paid/completed.. │  │ completed/paid.. │  │ booked..arrived  │
//! └────────┬─────────┘  └────────┬─────────┘  └────────┬─────────┘
//!          └──────────── From<..> for Payment ────────┘
//!                                │
//!                                ▼
//!                    Payment (one normalized shape)
//! ```
//!
//! Filters arrive in normalized terms; [`PaymentStatus::sale_statuses`],
//! [`PaymentStatus::dispatch_statuses`] and [`PaymentMethod::matches_dispatch`]
//! translate them back to each source's native values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Normalized Enums
// =============================================================================

/// Which collection a payment came from.
///
/// Declaration order is the tie-break order when two payments share a
/// timestamp.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentSource {
    Booking,
    Ticket,
    Dispatch,
}

impl PaymentSource {
    pub const ALL: [PaymentSource; 3] = [
        PaymentSource::Booking,
        PaymentSource::Ticket,
        PaymentSource::Dispatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSource::Booking => "booking",
            PaymentSource::Ticket => "ticket",
            PaymentSource::Dispatch => "dispatch",
        }
    }
}

impl fmt::Display for PaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
        PaymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    /// Native booking/ticket statuses that normalize to `self`.
    pub fn sale_statuses(&self) -> Vec<SaleStatus> {
        match self {
            PaymentStatus::Completed => vec![SaleStatus::Paid, SaleStatus::Completed],
            PaymentStatus::Pending => vec![SaleStatus::Pending],
            PaymentStatus::Failed => vec![SaleStatus::Failed],
            PaymentStatus::Refunded => vec![SaleStatus::Refunded],
            PaymentStatus::Cancelled => vec![SaleStatus::Cancelled],
        }
    }

    /// Native dispatch statuses that normalize to `self`.
    ///
    /// Empty when no dispatch can ever carry this status.
    pub fn dispatch_statuses(&self) -> Vec<DispatchStatus> {
        match self {
            PaymentStatus::Completed => vec![DispatchStatus::Arrived],
            PaymentStatus::Pending => vec![
                DispatchStatus::Booked,
                DispatchStatus::InTransit,
                DispatchStatus::Cancelled,
            ],
            PaymentStatus::Failed | PaymentStatus::Refunded | PaymentStatus::Cancelled => {
                Vec::new()
            }
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: PaymentStatus::ALL.iter().map(|s| s.to_string()).collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileBanking,
    BankTransfer,
    Online,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::MobileBanking,
        PaymentMethod::BankTransfer,
        PaymentMethod::Online,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::MobileBanking => "mobile_banking",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Online => "online",
        }
    }

    /// Dispatch charges are always settled in cash.
    pub fn matches_dispatch(&self) -> bool {
        *self == PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
            })
    }
}

// =============================================================================
// Source-native Statuses
// =============================================================================

/// Status of a booking or walk-in ticket as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SaleStatus {
    #[default]
    Pending,
    Paid,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl SaleStatus {
    pub fn normalized(&self) -> PaymentStatus {
        match self {
            SaleStatus::Paid | SaleStatus::Completed => PaymentStatus::Completed,
            SaleStatus::Pending => PaymentStatus::Pending,
            SaleStatus::Failed => PaymentStatus::Failed,
            SaleStatus::Refunded => PaymentStatus::Refunded,
            SaleStatus::Cancelled => PaymentStatus::Cancelled,
        }
    }
}

/// Parcel lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DispatchStatus {
    #[default]
    Booked,
    InTransit,
    Arrived,
    Cancelled,
}

impl DispatchStatus {
    /// Only an arrived parcel counts as collected; everything else is pending.
    pub fn normalized(&self) -> PaymentStatus {
        match self {
            DispatchStatus::Arrived => PaymentStatus::Completed,
            _ => PaymentStatus::Pending,
        }
    }
}

// =============================================================================
// Source Records
// =============================================================================

/// An online seat booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BookingRecord {
    pub id: String,
    pub company_id: String,
    pub booking_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[ts(type = "number")]
    pub amount: Money,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_status: SaleStatus,
    pub trip_name: String,
    pub route_name: String,
    pub bus_name: String,
    #[ts(as = "String")]
    pub departure_date: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A walk-in ticket sold at the counter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TicketRecord {
    pub id: String,
    pub company_id: String,
    pub ticket_number: String,
    pub passenger_name: String,
    pub passenger_email: Option<String>,
    pub passenger_phone: Option<String>,
    #[ts(type = "number")]
    pub amount: Money,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_status: SaleStatus,
    pub trip_name: String,
    pub route_name: String,
    pub bus_name: String,
    #[ts(as = "String")]
    pub departure_date: NaiveDate,
    pub seat_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A parcel sent on a bus route.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DispatchRecord {
    pub id: String,
    pub company_id: String,
    pub dispatch_number: String,
    pub sender_name: String,
    pub sender_phone: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    #[ts(type = "number")]
    pub charge: Money,
    pub currency: String,
    pub status: DispatchStatus,
    pub trip_name: Option<String>,
    pub route_name: Option<String>,
    pub bus_name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Normalized Payment
// =============================================================================

/// One entry in the payment ledger, whatever its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Payment {
    pub id: String,
    /// Booking, ticket or dispatch number.
    pub payment_id: String,
    pub source: PaymentSource,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[ts(type = "number")]
    pub amount: Money,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub trip_name: Option<String>,
    pub route_name: Option<String>,
    pub bus_name: Option<String>,
    #[ts(as = "Option<String>")]
    pub departure_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub payment_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl From<BookingRecord> for Payment {
    fn from(b: BookingRecord) -> Self {
        Payment {
            id: b.id,
            payment_id: b.booking_number,
            source: PaymentSource::Booking,
            customer_name: b.customer_name,
            customer_email: b.customer_email,
            customer_phone: b.customer_phone,
            amount: b.amount,
            currency: b.currency,
            payment_method: b.payment_method,
            payment_status: b.payment_status.normalized(),
            trip_name: Some(b.trip_name),
            route_name: Some(b.route_name),
            bus_name: Some(b.bus_name),
            departure_date: Some(b.departure_date),
            payment_date: b.created_at,
            created_at: b.created_at,
        }
    }
}

impl From<TicketRecord> for Payment {
    fn from(t: TicketRecord) -> Self {
        Payment {
            id: t.id,
            payment_id: t.ticket_number,
            source: PaymentSource::Ticket,
            customer_name: t.passenger_name,
            customer_email: t.passenger_email,
            customer_phone: t.passenger_phone,
            amount: t.amount,
            currency: t.currency,
            payment_method: t.payment_method,
            payment_status: t.payment_status.normalized(),
            trip_name: Some(t.trip_name),
            route_name: Some(t.route_name),
            bus_name: Some(t.bus_name),
            departure_date: Some(t.departure_date),
            payment_date: t.created_at,
            created_at: t.created_at,
        }
    }
}

impl From<DispatchRecord> for Payment {
    fn from(d: DispatchRecord) -> Self {
        Payment {
            id: d.id,
            payment_id: d.dispatch_number,
            source: PaymentSource::Dispatch,
            customer_name: d.sender_name,
            customer_email: None,
            customer_phone: Some(d.sender_phone),
            amount: d.charge,
            currency: d.currency,
            payment_method: PaymentMethod::Cash,
            payment_status: d.status.normalized(),
            trip_name: d.trip_name,
            route_name: d.route_name,
            bus_name: d.bus_name,
            departure_date: None,
            payment_date: d.created_at,
            created_at: d.created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(status: SaleStatus) -> TicketRecord {
        TicketRecord {
            id: "t-1".to_string(),
            company_id: "c-1".to_string(),
            ticket_number: "TKT-0001".to_string(),
            passenger_name: "Rahim".to_string(),
            passenger_email: Some("rahim@example.com".to_string()),
            passenger_phone: None,
            amount: Money::from_cents(5_000),
            currency: "BDT".to_string(),
            payment_method: PaymentMethod::MobileBanking,
            payment_status: status,
            trip_name: "Morning Express".to_string(),
            route_name: "Dhaka - Sylhet".to_string(),
            bus_name: "Bus 12".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            seat_number: Some("A4".to_string()),
            created_at: Utc::now(),
        }
    }

    fn dispatch(status: DispatchStatus) -> DispatchRecord {
        DispatchRecord {
            id: "d-1".to_string(),
            company_id: "c-1".to_string(),
            dispatch_number: "DSP-0001".to_string(),
            sender_name: "Karim".to_string(),
            sender_phone: "01700000000".to_string(),
            receiver_name: "Salma".to_string(),
            receiver_phone: "01800000000".to_string(),
            charge: Money::from_cents(7_500),
            currency: "BDT".to_string(),
            status,
            trip_name: None,
            route_name: Some("Dhaka - Sylhet".to_string()),
            bus_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sale_status_remap() {
        assert_eq!(SaleStatus::Paid.normalized(), PaymentStatus::Completed);
        assert_eq!(SaleStatus::Completed.normalized(), PaymentStatus::Completed);
        assert_eq!(SaleStatus::Pending.normalized(), PaymentStatus::Pending);
        assert_eq!(SaleStatus::Failed.normalized(), PaymentStatus::Failed);
        assert_eq!(SaleStatus::Refunded.normalized(), PaymentStatus::Refunded);
        assert_eq!(SaleStatus::Cancelled.normalized(), PaymentStatus::Cancelled);
    }

    #[test]
    fn test_dispatch_status_remap() {
        assert_eq!(DispatchStatus::Arrived.normalized(), PaymentStatus::Completed);
        for status in [
            DispatchStatus::Booked,
            DispatchStatus::InTransit,
            DispatchStatus::Cancelled,
        ] {
            assert_eq!(status.normalized(), PaymentStatus::Pending);
        }
    }

    #[test]
    fn test_filter_translation_round_trips_through_normalization() {
        for status in PaymentStatus::ALL {
            for native in status.sale_statuses() {
                assert_eq!(native.normalized(), status);
            }
            for native in status.dispatch_statuses() {
                assert_eq!(native.normalized(), status);
            }
        }
        assert!(PaymentStatus::Failed.dispatch_statuses().is_empty());
    }

    #[test]
    fn test_ticket_normalization() {
        let payment = Payment::from(ticket(SaleStatus::Paid));
        assert_eq!(payment.source, PaymentSource::Ticket);
        assert_eq!(payment.payment_id, "TKT-0001");
        assert_eq!(payment.customer_name, "Rahim");
        assert_eq!(payment.payment_status, PaymentStatus::Completed);
        assert_eq!(payment.payment_date, payment.created_at);
        assert_eq!(payment.trip_name.as_deref(), Some("Morning Express"));
    }

    #[test]
    fn test_dispatch_is_cash_without_email() {
        let payment = Payment::from(dispatch(DispatchStatus::InTransit));
        assert_eq!(payment.payment_method, PaymentMethod::Cash);
        assert_eq!(payment.customer_email, None);
        assert_eq!(payment.customer_name, "Karim");
        assert_eq!(payment.amount.cents(), 7_500);
        assert_eq!(payment.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "mobile_banking".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobileBanking
        );
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert!(PaymentMethod::Cash.matches_dispatch());
        assert!(!PaymentMethod::Card.matches_dispatch());
    }

    #[test]
    fn test_normalized_payment_json_shape() {
        let json = serde_json::to_value(Payment::from(ticket(SaleStatus::Completed))).unwrap();
        assert_eq!(json["source"], "ticket");
        assert_eq!(json["paymentStatus"], "completed");
        assert_eq!(json["paymentMethod"], "mobile_banking");
        assert_eq!(json["amount"], 50.0);
        assert_eq!(json["departureDate"], "2026-03-02");
    }
}
