//! SQL fragments shared by the payment source repositories.
//!
//! Each source pushes the same predicates, only the search columns and the
//! native status/method values differ:
//!
//! ```text
//! SELECT ... FROM <source>
//!  WHERE company_id = ? AND deleted_at IS NULL
//!    AND created_at >= ? AND created_at < ?           -- date range
//!    AND (LOWER(COALESCE(col, '')) LIKE ? ESCAPE '\'  -- search, OR-ed
//!         OR ...)
//!    AND <status column> IN (?, ...)                  -- native statuses
//!    AND payment_method = ?
//!  ORDER BY created_at DESC, id ASC
//! ```

use sqlx::{QueryBuilder, Sqlite};

use busdesk_core::ledger::{PaymentFilter, LIKE_ESCAPE};

/// `WHERE company_id = ? AND deleted_at IS NULL`
pub(crate) fn push_company_scope(qb: &mut QueryBuilder<'_, Sqlite>, company_id: &str) {
    qb.push(" WHERE company_id = ")
        .push_bind(company_id.to_string())
        .push(" AND deleted_at IS NULL");
}

/// Inclusive start day, inclusive end day on `created_at`.
pub(crate) fn push_date_range(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PaymentFilter) {
    if let Some(from) = filter.created_from() {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(before) = filter.created_before() {
        qb.push(" AND created_at < ").push_bind(before);
    }
}

/// Case-insensitive substring match OR-ed across `columns`.
pub(crate) fn push_search(
    qb: &mut QueryBuilder<'_, Sqlite>,
    filter: &PaymentFilter,
    columns: &[&str],
) {
    let Some(pattern) = filter.search_pattern() else {
        return;
    };
    if columns.is_empty() {
        return;
    }

    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("LOWER(COALESCE({column}, '')) LIKE "))
            .push_bind(pattern.clone())
            .push(format!(" ESCAPE '{LIKE_ESCAPE}'"));
    }
    qb.push(")");
}

/// `AND column IN (?, ?, ...)`; an empty set matches nothing.
pub(crate) fn push_in<'args, T>(
    qb: &mut QueryBuilder<'args, Sqlite>,
    column: &str,
    values: Vec<T>,
) where
    T: 'args + sqlx::Encode<'args, Sqlite> + sqlx::Type<Sqlite> + Send,
{
    if values.is_empty() {
        qb.push(" AND 0");
        return;
    }

    qb.push(format!(" AND {column} IN ("));
    let mut separated = qb.separated(", ");
    for value in values {
        separated.push_bind(value);
    }
    separated.push_unseparated(")");
}

/// Newest first with a stable tie-break.
pub(crate) fn push_ledger_order(qb: &mut QueryBuilder<'_, Sqlite>) {
    qb.push(" ORDER BY created_at DESC, id ASC");
}
