//! # Payment Ledger
//!
//! Combines per-source payment lists into one page of the ledger.
//!
//! ## Flow
//! ```text
//! ┌───────────────┐  ┌───────────────┐  ┌───────────────┐
//! │ bookings      │  │ tickets       │  │ dispatches    │   each already
//! │ (newest first)│  │ (newest first)│  │ (newest first)│   filtered in SQL
//! └───────┬───────┘  └───────┬───────┘  └───────┬───────┘
//!         └──────────────────┼──────────────────┘
//!                            ▼
//!                  merge_sorted (k-way, heap)
//!                            │
//!              ┌─────────────┴──────────────┐
//!              ▼                            ▼
//!     PaymentStats (all rows)      PageRequest slice (one page)
//!              └─────────────┬──────────────┘
//!                            ▼
//!                        LedgerPage
//! ```
//!
//! Ordering is `paymentDate` descending, then source, then id, so the same
//! filters always produce the same pages.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::payment::{Payment, PaymentMethod, PaymentSource, PaymentStatus};

// =============================================================================
// Filters
// =============================================================================

/// Filters applied to every source before merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    /// First day included (UTC).
    pub start_date: Option<NaiveDate>,
    /// Last day included (UTC).
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

impl PaymentFilter {
    /// Lower bound on creation time, inclusive.
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Upper bound on creation time, exclusive: midnight after `end_date`.
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .map(|date| date + Duration::days(1))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// A lowercase `LIKE` pattern for the search term, with `%`, `_` and `\`
    /// escaped. `None` when there is no usable term.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }
        Some(format!("%{}%", escape_like(&term.to_lowercase())))
    }

    /// Whether any record of `source` could satisfy the status and method
    /// filters. Sources that cannot are not queried at all.
    pub fn can_match(&self, source: PaymentSource) -> bool {
        match source {
            PaymentSource::Booking | PaymentSource::Ticket => true,
            PaymentSource::Dispatch => {
                let method_ok = self
                    .payment_method
                    .map_or(true, |method| method.matches_dispatch());
                let status_ok = self
                    .status
                    .map_or(true, |status| !status.dispatch_statuses().is_empty());
                method_ok && status_ok
            }
        }
    }
}

/// Escape character used in generated `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Pagination
// =============================================================================

/// A validated page request. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamps `page` to at least 1 and `limit` to `1..=max_limit`.
    pub fn new(page: u32, limit: u32, max_limit: u32) -> Self {
        PageRequest {
            page: page.max(1),
            limit: limit.clamp(1, max_limit.max(1)),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let limit = request.limit() as usize;
        Pagination {
            page: request.page(),
            limit: request.limit(),
            total,
            pages: if total == 0 { 0 } else { total.div_ceil(limit) },
        }
    }
}

// =============================================================================
// Stats
// =============================================================================

/// Totals over every payment matching the filters, not just one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentStats {
    #[ts(type = "number")]
    pub total_amount: Money,
    pub total_payments: usize,
    #[ts(type = "number")]
    pub completed_amount: Money,
    pub completed_count: usize,
    #[ts(type = "number")]
    pub pending_amount: Money,
    pub pending_count: usize,
    #[ts(type = "number")]
    pub failed_amount: Money,
    pub failed_count: usize,
}

impl PaymentStats {
    pub fn from_payments(payments: &[Payment]) -> Self {
        payments.iter().fold(PaymentStats::default(), |mut stats, p| {
            stats.total_amount = stats.total_amount.saturating_add(p.amount);
            stats.total_payments += 1;
            match p.payment_status {
                PaymentStatus::Completed => {
                    stats.completed_amount = stats.completed_amount.saturating_add(p.amount);
                    stats.completed_count += 1;
                }
                PaymentStatus::Pending => {
                    stats.pending_amount = stats.pending_amount.saturating_add(p.amount);
                    stats.pending_count += 1;
                }
                PaymentStatus::Failed => {
                    stats.failed_amount = stats.failed_amount.saturating_add(p.amount);
                    stats.failed_count += 1;
                }
                PaymentStatus::Refunded | PaymentStatus::Cancelled => {}
            }
            stats
        })
    }
}

// =============================================================================
// Merge
// =============================================================================

/// Ledger order: newest first, then source, then id.
pub fn ledger_order(a: &Payment, b: &Payment) -> Ordering {
    b.payment_date
        .cmp(&a.payment_date)
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.id.cmp(&b.id))
}

struct HeapEntry {
    payment: Payment,
    list: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // BinaryHeap is a max-heap; the entry first in ledger order must be greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        ledger_order(&other.payment, &self.payment)
    }
}

/// Merges lists that are each already in [`ledger_order`].
pub fn merge_sorted(lists: Vec<Vec<Payment>>) -> Vec<Payment> {
    let total = lists.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut heap = BinaryHeap::with_capacity(iters.len());

    for (list, iter) in iters.iter_mut().enumerate() {
        if let Some(payment) = iter.next() {
            heap.push(HeapEntry { payment, list });
        }
    }

    let mut merged = Vec::with_capacity(total);
    while let Some(HeapEntry { payment, list }) = heap.pop() {
        if let Some(next) = iters[list].next() {
            heap.push(HeapEntry {
                payment: next,
                list,
            });
        }
        merged.push(payment);
    }
    merged
}

// =============================================================================
// Ledger Page
// =============================================================================

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct LedgerPage {
    pub payments: Vec<Payment>,
    pub pagination: Pagination,
    pub stats: PaymentStats,
}

impl LedgerPage {
    /// Merges the per-source lists, computes stats over all of them and
    /// slices out the requested page.
    pub fn assemble(lists: Vec<Vec<Payment>>, request: PageRequest) -> Self {
        let merged = merge_sorted(lists);
        let stats = PaymentStats::from_payments(&merged);
        let pagination = Pagination::new(request, merged.len());

        let payments = merged
            .into_iter()
            .skip(request.offset())
            .take(request.limit() as usize)
            .collect();

        LedgerPage {
            payments,
            pagination,
            stats,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payment(
        id: &str,
        source: PaymentSource,
        cents: i64,
        status: PaymentStatus,
        minute: u32,
    ) -> Payment {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, minute, 0).unwrap();
        Payment {
            id: id.to_string(),
            payment_id: id.to_uppercase(),
            source,
            customer_name: "Customer".to_string(),
            customer_email: None,
            customer_phone: None,
            amount: Money::from_cents(cents),
            currency: "BDT".to_string(),
            payment_method: PaymentMethod::Cash,
            payment_status: status,
            trip_name: None,
            route_name: None,
            bus_name: None,
            departure_date: None,
            payment_date: at,
            created_at: at,
        }
    }

    /// Three bookings, two tickets and one dispatch for one company.
    fn six_records() -> Vec<Vec<Payment>> {
        use PaymentSource::*;
        use PaymentStatus::*;
        vec![
            vec![
                payment("b-3", Booking, 10_000, Completed, 50),
                payment("b-2", Booking, 20_000, Pending, 30),
                payment("b-1", Booking, 10_000, Completed, 10),
            ],
            vec![
                payment("t-2", Ticket, 5_000, Completed, 40),
                payment("t-1", Ticket, 5_000, Completed, 20),
            ],
            vec![payment("d-1", Dispatch, 7_500, Pending, 45)],
        ]
    }

    #[test]
    fn test_merge_orders_newest_first() {
        let merged = merge_sorted(six_records());
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b-3", "d-1", "t-2", "b-2", "t-1", "b-1"]);

        for pair in merged.windows(2) {
            assert!(pair[0].payment_date >= pair[1].payment_date);
        }
    }

    #[test]
    fn test_merge_breaks_ties_by_source_then_id() {
        use PaymentSource::*;
        let merged = merge_sorted(vec![
            vec![payment("d-1", Dispatch, 100, PaymentStatus::Pending, 5)],
            vec![
                payment("t-1", Ticket, 100, PaymentStatus::Pending, 5),
                payment("t-2", Ticket, 100, PaymentStatus::Pending, 5),
            ],
            vec![payment("b-9", Booking, 100, PaymentStatus::Pending, 5)],
        ]);
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b-9", "t-1", "t-2", "d-1"]);
    }

    #[test]
    fn test_six_record_scenario() {
        let page = LedgerPage::assemble(six_records(), PageRequest::new(1, 2, 100));

        assert_eq!(page.payments.len(), 2);
        assert_eq!(page.pagination.total, 6);
        assert_eq!(page.pagination.pages, 3);

        assert_eq!(page.stats.total_payments, 6);
        assert_eq!(page.stats.total_amount, Money::from_cents(57_500));
        assert_eq!(page.stats.completed_amount, Money::from_cents(30_000));
        assert_eq!(page.stats.completed_count, 4);
        assert_eq!(page.stats.pending_amount, Money::from_cents(27_500));
        assert_eq!(page.stats.pending_count, 2);
        assert_eq!(page.stats.failed_count, 0);
    }

    #[test]
    fn test_stats_saturate_instead_of_overflowing() {
        let huge = i64::MAX / 2 + 1;
        let payments = vec![
            payment("t-1", PaymentSource::Ticket, huge, PaymentStatus::Completed, 1),
            payment("t-2", PaymentSource::Ticket, huge, PaymentStatus::Completed, 2),
        ];

        let stats = PaymentStats::from_payments(&payments);
        assert_eq!(stats.total_amount, Money::from_cents(i64::MAX));
        assert_eq!(stats.completed_amount, Money::from_cents(i64::MAX));
        assert_eq!(stats.completed_count, 2);
    }

    #[test]
    fn test_stats_independent_of_page() {
        let first = LedgerPage::assemble(six_records(), PageRequest::new(1, 2, 100));
        let last = LedgerPage::assemble(six_records(), PageRequest::new(3, 2, 100));
        let beyond = LedgerPage::assemble(six_records(), PageRequest::new(9, 5, 100));
        let all = LedgerPage::assemble(six_records(), PageRequest::new(1, 100, 100));

        assert_eq!(first.stats, all.stats);
        assert_eq!(last.stats, all.stats);
        assert_eq!(beyond.stats, all.stats);
        assert!(beyond.payments.is_empty());
        assert_eq!(last.payments[1].id, "b-1");
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 0, 100);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 1);

        let req = PageRequest::new(3, 500, 100);
        assert_eq!(req.limit(), 100);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_empty_ledger() {
        let page = LedgerPage::assemble(vec![Vec::new(), Vec::new()], PageRequest::new(1, 20, 100));
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.pages, 0);
        assert_eq!(page.stats, PaymentStats::default());
    }

    #[test]
    fn test_date_bounds_cover_whole_days() {
        let filter = PaymentFilter {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 2),
            ..Default::default()
        };
        assert_eq!(
            filter.created_from().unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            filter.created_before().unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let filter = PaymentFilter {
            search: Some("  50%_Off\\ ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().unwrap(), "%50\\%\\_off\\\\%");

        let blank = PaymentFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.search_pattern(), None);
    }

    #[test]
    fn test_dispatch_skipped_when_it_cannot_match() {
        let card = PaymentFilter {
            payment_method: Some(PaymentMethod::Card),
            ..Default::default()
        };
        assert!(!card.can_match(PaymentSource::Dispatch));
        assert!(card.can_match(PaymentSource::Booking));

        let failed = PaymentFilter {
            status: Some(PaymentStatus::Failed),
            ..Default::default()
        };
        assert!(!failed.can_match(PaymentSource::Dispatch));

        let cash_completed = PaymentFilter {
            status: Some(PaymentStatus::Completed),
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        };
        assert!(cash_completed.can_match(PaymentSource::Dispatch));
    }
}
