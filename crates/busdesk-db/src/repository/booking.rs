//! # Booking Repository
//!
//! Online seat bookings, one of the three payment sources.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::filter::{push_company_scope, push_date_range, push_in, push_ledger_order, push_search};
use crate::error::DbResult;
use busdesk_core::{BookingRecord, PaymentFilter};

const BOOKING_COLUMNS: &str = "id, company_id, booking_number, customer_name, customer_email, \
                               customer_phone, amount, currency, payment_method, payment_status, \
                               trip_name, route_name, bus_name, departure_date, created_at";

/// Columns a ledger search looks in.
const BOOKING_SEARCH_COLUMNS: &[&str] = &[
    "customer_name",
    "customer_email",
    "customer_phone",
    "booking_number",
    "trip_name",
    "route_name",
];

#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Bookings matching the ledger filters, newest first.
    pub async fn find(&self, company_id: &str, filter: &PaymentFilter) -> DbResult<Vec<BookingRecord>> {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {BOOKING_COLUMNS} FROM bookings"));

        push_company_scope(&mut qb, company_id);
        push_date_range(&mut qb, filter);
        push_search(&mut qb, filter, BOOKING_SEARCH_COLUMNS);
        if let Some(status) = filter.status {
            push_in(&mut qb, "payment_status", status.sale_statuses());
        }
        if let Some(method) = filter.payment_method {
            qb.push(" AND payment_method = ").push_bind(method);
        }
        push_ledger_order(&mut qb);

        let bookings = qb
            .build_query_as::<BookingRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(company_id = %company_id, count = bookings.len(), "Fetched bookings");
        Ok(bookings)
    }

    pub async fn insert(&self, booking: &BookingRecord) -> DbResult<BookingRecord> {
        debug!(booking_number = %booking.booking_number, "Inserting booking");

        sqlx::query(
            "INSERT INTO bookings (id, company_id, booking_number, customer_name, customer_email,
                                   customer_phone, amount, currency, payment_method, payment_status,
                                   trip_name, route_name, bus_name, departure_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&booking.id)
        .bind(&booking.company_id)
        .bind(&booking.booking_number)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(booking.amount)
        .bind(&booking.currency)
        .bind(booking.payment_method)
        .bind(booking.payment_status)
        .bind(&booking.trip_name)
        .bind(&booking.route_name)
        .bind(&booking.bus_name)
        .bind(booking.departure_date)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await?;

        Ok(booking.clone())
    }
}
