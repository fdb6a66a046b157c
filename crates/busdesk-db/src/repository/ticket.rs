//! # Ticket Repository
//!
//! Walk-in tickets sold at the counter. `POST /bus/payments` records one
//! of these.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::filter::{push_company_scope, push_date_range, push_in, push_ledger_order, push_search};
use crate::error::DbResult;
use busdesk_core::{PaymentFilter, TicketRecord};

const TICKET_COLUMNS: &str = "id, company_id, ticket_number, passenger_name, passenger_email, \
                              passenger_phone, amount, currency, payment_method, payment_status, \
                              trip_name, route_name, bus_name, departure_date, seat_number, \
                              created_at";

/// Columns a ledger search looks in.
const TICKET_SEARCH_COLUMNS: &[&str] = &[
    "passenger_name",
    "passenger_email",
    "passenger_phone",
    "ticket_number",
    "trip_name",
    "route_name",
];

#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Tickets matching the ledger filters, newest first.
    pub async fn find(&self, company_id: &str, filter: &PaymentFilter) -> DbResult<Vec<TicketRecord>> {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {TICKET_COLUMNS} FROM tickets"));

        push_company_scope(&mut qb, company_id);
        push_date_range(&mut qb, filter);
        push_search(&mut qb, filter, TICKET_SEARCH_COLUMNS);
        if let Some(status) = filter.status {
            push_in(&mut qb, "payment_status", status.sale_statuses());
        }
        if let Some(method) = filter.payment_method {
            qb.push(" AND payment_method = ").push_bind(method);
        }
        push_ledger_order(&mut qb);

        let tickets = qb
            .build_query_as::<TicketRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(company_id = %company_id, count = tickets.len(), "Fetched tickets");
        Ok(tickets)
    }

    pub async fn insert(&self, ticket: &TicketRecord) -> DbResult<TicketRecord> {
        debug!(ticket_number = %ticket.ticket_number, "Inserting ticket");

        sqlx::query(
            "INSERT INTO tickets (id, company_id, ticket_number, passenger_name, passenger_email,
                                  passenger_phone, amount, currency, payment_method, payment_status,
                                  trip_name, route_name, bus_name, departure_date, seat_number,
                                  created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )
        .bind(&ticket.id)
        .bind(&ticket.company_id)
        .bind(&ticket.ticket_number)
        .bind(&ticket.passenger_name)
        .bind(&ticket.passenger_email)
        .bind(&ticket.passenger_phone)
        .bind(ticket.amount)
        .bind(&ticket.currency)
        .bind(ticket.payment_method)
        .bind(ticket.payment_status)
        .bind(&ticket.trip_name)
        .bind(&ticket.route_name)
        .bind(&ticket.bus_name)
        .bind(ticket.departure_date)
        .bind(&ticket.seat_number)
        .bind(ticket.created_at)
        .execute(&self.pool)
        .await?;

        Ok(ticket.clone())
    }
}

/// Generates a ticket number in format: TKT-YYYYMMDD-XXXXXXXX
///
/// ## Example
/// `TKT-20260302-3F9A1C07`
pub fn generate_ticket_number() -> String {
    let date_part = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_ascii_uppercase();
    format!("TKT-{}-{}", date_part, suffix)
}
