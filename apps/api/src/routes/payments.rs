//! # Payments
//!
//! `GET /bus/payments` returns one page of the combined ledger with stats
//! over every matching payment. `POST /bus/payments` records a walk-in
//! ticket sale and returns it in the normalized ledger shape.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use busdesk_core::validation::{
    validate_currency, validate_date_range, validate_name, validate_payment_amount,
    validate_search_query, RequiredFields,
};
use busdesk_core::{
    Money, PageRequest, Payment, PaymentFilter, PaymentMethod, PaymentStatus, SaleStatus,
    TicketRecord, DEFAULT_CURRENCY, MAX_NAME_LENGTH,
};
use busdesk_db::generate_ticket_number;

use crate::auth::CompanyScope;
use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::mailer::receipt_email;
use crate::AppState;

// =============================================================================
// GET /bus/payments
// =============================================================================

/// Ledger query string. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

/// `""` and `"all"` mean no filter, as the dashboard's dropdowns send them.
fn filter_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl LedgerQuery {
    pub fn into_filter(self, config: &ApiConfig) -> ApiResult<(PaymentFilter, PageRequest)> {
        let status = filter_value(self.status.as_deref())
            .map(str::parse::<PaymentStatus>)
            .transpose()?;
        let payment_method = filter_value(self.payment_method.as_deref())
            .map(str::parse::<PaymentMethod>)
            .transpose()?;

        validate_date_range(self.start_date, self.end_date)?;

        let search = match self.search.as_deref() {
            Some(term) => Some(validate_search_query(term)?).filter(|t| !t.is_empty()),
            None => None,
        };

        let filter = PaymentFilter {
            status,
            payment_method,
            start_date: self.start_date,
            end_date: self.end_date,
            search,
        };
        let request = PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(config.default_page_size),
            config.max_page_size,
        );

        Ok((filter, request))
    }
}

pub async fn list_payments(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiQuery(query): ApiQuery<LedgerQuery>,
) -> ApiResult<Json<Value>> {
    let (filter, request) = query.into_filter(&state.config)?;

    let page = state
        .db
        .ledger()
        .page(&scope.company_id, &filter, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "payments": page.payments,
        "pagination": page.pagination,
        "stats": page.stats,
    })))
}

// =============================================================================
// POST /bus/payments
// =============================================================================

/// A walk-in sale. Fields are optional here so all missing ones can be
/// reported in one response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub trip_name: Option<String>,
    pub route_name: Option<String>,
    pub bus_name: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub seat_number: Option<String>,
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn record_payment(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiJson(body): ApiJson<RecordPaymentRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut required = RequiredFields::default();
    let customer_name = required.text("customerName", body.customer_name);
    let amount = required.take("amount", body.amount);
    let payment_method = required.text("paymentMethod", body.payment_method);
    let trip_name = required.text("tripName", body.trip_name);
    let bus_name = required.text("busName", body.bus_name);
    let departure_date = required.take("departureDate", body.departure_date);

    let (
        Some(customer_name),
        Some(amount),
        Some(payment_method),
        Some(trip_name),
        Some(bus_name),
        Some(departure_date),
    ) = (customer_name, amount, payment_method, trip_name, bus_name, departure_date)
    else {
        return Err(required.into_error().into());
    };

    let customer_name = validate_name("customerName", &customer_name, MAX_NAME_LENGTH)?;
    let trip_name = validate_name("tripName", &trip_name, MAX_NAME_LENGTH)?;
    let bus_name = validate_name("busName", &bus_name, MAX_NAME_LENGTH)?;
    let payment_method: PaymentMethod = payment_method.parse()?;
    let amount = Money::from_decimal(amount);
    validate_payment_amount(amount)?;
    let currency = match optional_text(body.currency) {
        Some(code) => validate_currency(&code)?,
        None => DEFAULT_CURRENCY.to_string(),
    };

    let ticket = TicketRecord {
        id: Uuid::new_v4().to_string(),
        company_id: scope.company_id.clone(),
        ticket_number: generate_ticket_number(),
        passenger_name: customer_name,
        passenger_email: optional_text(body.customer_email),
        passenger_phone: optional_text(body.customer_phone),
        amount,
        currency,
        payment_method,
        payment_status: SaleStatus::Completed,
        trip_name,
        route_name: optional_text(body.route_name).unwrap_or_default(),
        bus_name,
        departure_date,
        seat_number: optional_text(body.seat_number),
        created_at: Utc::now(),
    };

    let ticket = state.db.tickets().insert(&ticket).await?;
    let payment = Payment::from(ticket);

    info!(
        company_id = %scope.company_id,
        payment_id = %payment.payment_id,
        amount = %payment.amount,
        "Recorded walk-in payment"
    );

    if let Some(receipt) = receipt_email(&payment) {
        if let Err(e) = state.mailer.send(&receipt).await {
            warn!(payment_id = %payment.payment_id, error = %e, "Receipt email failed");
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "payment": payment })),
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_all_means_no_filter() {
        let query = LedgerQuery {
            status: Some("all".to_string()),
            payment_method: Some("".to_string()),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let (filter, request) = query.into_filter(&ApiConfig::default()).unwrap();

        assert_eq!(filter, PaymentFilter::default());
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), busdesk_core::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_limit_clamped_to_max_page_size() {
        let query = LedgerQuery {
            page: Some(0),
            limit: Some(10_000),
            ..Default::default()
        };
        let (_, request) = query.into_filter(&ApiConfig::default()).unwrap();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), busdesk_core::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let query = LedgerQuery {
            status: Some("settled".to_string()),
            ..Default::default()
        };
        let err = query.into_filter(&ApiConfig::default()).unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref fields, .. } if fields == &["status"]));
    }

    #[test]
    fn test_reversed_date_range_rejected() {
        let query = LedgerQuery {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 5),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            ..Default::default()
        };
        assert!(query.into_filter(&ApiConfig::default()).is_err());
    }
}
