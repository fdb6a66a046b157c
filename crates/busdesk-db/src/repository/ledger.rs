//! # Ledger Repository
//!
//! One page of the payment ledger across bookings, tickets and dispatches.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  LedgerRepository::page(company, filter, page)                       │
//! │       │                                                              │
//! │       ├── bookings().find   ─┐                                       │
//! │       ├── tickets().find    ─┼── concurrently (tokio::try_join!)     │
//! │       └── dispatches().find ─┘   any error aborts the whole page     │
//! │       │                                                              │
//! │       ▼                                                              │
//! │  normalize → LedgerPage::assemble (merge, stats, slice)              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use busdesk_core::{LedgerPage, PageRequest, Payment, PaymentFilter};

#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: Database,
}

impl LedgerRepository {
    pub fn new(db: Database) -> Self {
        LedgerRepository { db }
    }

    /// Every payment matching `filter`, normalized, one list per source.
    ///
    /// Each list is in ledger order already.
    pub async fn sources(
        &self,
        company_id: &str,
        filter: &PaymentFilter,
    ) -> DbResult<Vec<Vec<Payment>>> {
        let bookings = self.db.bookings();
        let tickets = self.db.tickets();
        let dispatches = self.db.dispatches();

        let (bookings, tickets, dispatches) = tokio::try_join!(
            bookings.find(company_id, filter),
            tickets.find(company_id, filter),
            dispatches.find(company_id, filter),
        )?;

        debug!(
            bookings = bookings.len(),
            tickets = tickets.len(),
            dispatches = dispatches.len(),
            "Fetched payment sources"
        );

        Ok(vec![
            bookings.into_iter().map(Payment::from).collect(),
            tickets.into_iter().map(Payment::from).collect(),
            dispatches.into_iter().map(Payment::from).collect(),
        ])
    }

    /// One page plus stats over the whole filtered set.
    pub async fn page(
        &self,
        company_id: &str,
        filter: &PaymentFilter,
        request: PageRequest,
    ) -> DbResult<LedgerPage> {
        let sources = self.sources(company_id, filter).await?;
        let page = LedgerPage::assemble(sources, request);

        info!(
            company_id = %company_id,
            total = page.pagination.total,
            page = page.pagination.page,
            returned = page.payments.len(),
            "Assembled payment ledger page"
        );

        Ok(page)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use busdesk_core::{
        BookingRecord, DispatchRecord, DispatchStatus, Money, PaymentMethod, PaymentSource,
        PaymentStatus, SaleStatus, TicketRecord,
    };
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(day: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, minute, 0).unwrap()
    }

    fn booking(id: &str, cents: i64, status: SaleStatus, created: DateTime<Utc>) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            company_id: "c-1".to_string(),
            booking_number: format!("BK-{id}"),
            customer_name: format!("Customer {id}"),
            customer_email: Some(format!("{id}@example.com")),
            customer_phone: Some("01711111111".to_string()),
            amount: Money::from_cents(cents),
            currency: "BDT".to_string(),
            payment_method: PaymentMethod::Card,
            payment_status: status,
            trip_name: "Morning Express".to_string(),
            route_name: "Dhaka - Sylhet".to_string(),
            bus_name: "Bus 12".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            created_at: created,
        }
    }

    fn ticket(id: &str, name: &str, created: DateTime<Utc>) -> TicketRecord {
        TicketRecord {
            id: id.to_string(),
            company_id: "c-1".to_string(),
            ticket_number: format!("TKT-{id}"),
            passenger_name: name.to_string(),
            passenger_email: None,
            passenger_phone: None,
            amount: Money::from_cents(5_000),
            currency: "BDT".to_string(),
            payment_method: PaymentMethod::Cash,
            payment_status: SaleStatus::Completed,
            trip_name: "Night Coach".to_string(),
            route_name: "Dhaka - Chittagong".to_string(),
            bus_name: "Bus 7".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            seat_number: None,
            created_at: created,
        }
    }

    fn dispatch(id: &str, status: DispatchStatus, created: DateTime<Utc>) -> DispatchRecord {
        DispatchRecord {
            id: id.to_string(),
            company_id: "c-1".to_string(),
            dispatch_number: format!("DSP-{id}"),
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
            created_at: created,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.bookings().insert(&booking("b-1", 10_000, SaleStatus::Paid, at(1, 10))).await.unwrap();
        db.bookings().insert(&booking("b-2", 20_000, SaleStatus::Pending, at(2, 30))).await.unwrap();
        db.bookings().insert(&booking("b-3", 10_000, SaleStatus::Completed, at(3, 50))).await.unwrap();
        db.tickets().insert(&ticket("t-1", "Rahim 50%", at(1, 20))).await.unwrap();
        db.tickets().insert(&ticket("t-2", "Fatema", at(2, 40))).await.unwrap();
        db.dispatches().insert(&dispatch("d-1", DispatchStatus::InTransit, at(3, 45))).await.unwrap();

        // Another company's payment never shows up
        let mut foreign = booking("x-1", 99_900, SaleStatus::Paid, at(2, 0));
        foreign.company_id = "c-2".to_string();
        db.bookings().insert(&foreign).await.unwrap();

        db
    }

    #[tokio::test]
    async fn test_page_merges_all_sources_newest_first() {
        let db = seeded().await;
        let page = db
            .ledger()
            .page("c-1", &PaymentFilter::default(), PageRequest::new(1, 2, 100))
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 6);
        assert_eq!(page.pagination.pages, 3);
        assert_eq!(page.payments.len(), 2);
        assert_eq!(page.payments[0].id, "b-3");
        assert_eq!(page.payments[1].id, "d-1");

        assert_eq!(page.stats.total_amount, Money::from_cents(57_500));
        assert_eq!(page.stats.completed_amount, Money::from_cents(30_000));
        assert_eq!(page.stats.pending_amount, Money::from_cents(27_500));
    }

    #[tokio::test]
    async fn test_status_filter_translates_per_source() {
        let db = seeded().await;
        let filter = PaymentFilter {
            status: Some(PaymentStatus::Completed),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &filter, PageRequest::new(1, 100, 100)).await.unwrap();

        let ids: Vec<&str> = page.payments.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b-3", "t-2", "t-1", "b-1"]);
        assert!(page.payments.iter().all(|p| p.payment_status == PaymentStatus::Completed));

        let pending = PaymentFilter {
            status: Some(PaymentStatus::Pending),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &pending, PageRequest::new(1, 100, 100)).await.unwrap();
        let ids: Vec<&str> = page.payments.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d-1", "b-2"]);
    }

    #[tokio::test]
    async fn test_card_filter_skips_dispatches() {
        let db = seeded().await;
        let filter = PaymentFilter {
            payment_method: Some(PaymentMethod::Card),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &filter, PageRequest::new(1, 100, 100)).await.unwrap();

        assert_eq!(page.pagination.total, 3);
        assert!(page.payments.iter().all(|p| p.source == PaymentSource::Booking));
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive_by_day() {
        let db = seeded().await;
        let filter = PaymentFilter {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 2),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &filter, PageRequest::new(1, 100, 100)).await.unwrap();

        let ids: Vec<&str> = page.payments.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t-2", "b-2"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_literal() {
        let db = seeded().await;

        let filter = PaymentFilter {
            search: Some("FATEMA".to_string()),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &filter, PageRequest::new(1, 100, 100)).await.unwrap();
        assert_eq!(page.payments.len(), 1);
        assert_eq!(page.payments[0].id, "t-2");

        // '%' is matched literally, not as a wildcard
        let filter = PaymentFilter {
            search: Some("50%".to_string()),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &filter, PageRequest::new(1, 100, 100)).await.unwrap();
        let ids: Vec<&str> = page.payments.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t-1"]);

        // Route names are searched on every source
        let filter = PaymentFilter {
            search: Some("sylhet".to_string()),
            ..Default::default()
        };
        let page = db.ledger().page("c-1", &filter, PageRequest::new(1, 100, 100)).await.unwrap();
        assert_eq!(page.pagination.total, 4);
    }
}
