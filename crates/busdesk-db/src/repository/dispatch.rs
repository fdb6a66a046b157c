//! # Dispatch Repository
//!
//! Parcel dispatches. Their charge counts as a cash payment in the ledger.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::filter::{push_company_scope, push_date_range, push_in, push_ledger_order, push_search};
use crate::error::DbResult;
use busdesk_core::{DispatchRecord, PaymentFilter, PaymentSource};

const DISPATCH_COLUMNS: &str = "id, company_id, dispatch_number, sender_name, sender_phone, \
                                receiver_name, receiver_phone, charge, currency, status, \
                                trip_name, route_name, bus_name, created_at";

/// Columns a ledger search looks in. Dispatches carry no email.
const DISPATCH_SEARCH_COLUMNS: &[&str] = &[
    "sender_name",
    "sender_phone",
    "receiver_name",
    "receiver_phone",
    "dispatch_number",
    "trip_name",
    "route_name",
];

#[derive(Debug, Clone)]
pub struct DispatchRepository {
    pool: SqlitePool,
}

impl DispatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DispatchRepository { pool }
    }

    /// Dispatches matching the ledger filters, newest first.
    ///
    /// Returns nothing without querying when the filters exclude every
    /// dispatch (a non-cash method, or a status no parcel can have).
    pub async fn find(
        &self,
        company_id: &str,
        filter: &PaymentFilter,
    ) -> DbResult<Vec<DispatchRecord>> {
        if !filter.can_match(PaymentSource::Dispatch) {
            debug!("Dispatch source skipped by filters");
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {DISPATCH_COLUMNS} FROM dispatches"));

        push_company_scope(&mut qb, company_id);
        push_date_range(&mut qb, filter);
        push_search(&mut qb, filter, DISPATCH_SEARCH_COLUMNS);
        if let Some(status) = filter.status {
            push_in(&mut qb, "status", status.dispatch_statuses());
        }
        push_ledger_order(&mut qb);

        let dispatches = qb
            .build_query_as::<DispatchRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(company_id = %company_id, count = dispatches.len(), "Fetched dispatches");
        Ok(dispatches)
    }

    pub async fn insert(&self, dispatch: &DispatchRecord) -> DbResult<DispatchRecord> {
        debug!(dispatch_number = %dispatch.dispatch_number, "Inserting dispatch");

        sqlx::query(
            "INSERT INTO dispatches (id, company_id, dispatch_number, sender_name, sender_phone,
                                     receiver_name, receiver_phone, charge, currency, status,
                                     trip_name, route_name, bus_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&dispatch.id)
        .bind(&dispatch.company_id)
        .bind(&dispatch.dispatch_number)
        .bind(&dispatch.sender_name)
        .bind(&dispatch.sender_phone)
        .bind(&dispatch.receiver_name)
        .bind(&dispatch.receiver_phone)
        .bind(dispatch.charge)
        .bind(&dispatch.currency)
        .bind(dispatch.status)
        .bind(&dispatch.trip_name)
        .bind(&dispatch.route_name)
        .bind(&dispatch.bus_name)
        .bind(dispatch.created_at)
        .execute(&self.pool)
        .await?;

        Ok(dispatch.clone())
    }
}
