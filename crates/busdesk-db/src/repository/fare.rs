//! # Fare Repository
//!
//! Only `fare_amount` and `discount_percent` are stored; the discounted
//! price is derived on read by [`busdesk_core::Fare::discounted_amount`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use busdesk_core::Fare;

const FARE_COLUMNS: &str = "id, company_id, route_name, origin, destination, fare_amount, \
                            currency, discount_percent, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct FareRepository {
    pool: SqlitePool,
}

impl FareRepository {
    pub fn new(pool: SqlitePool) -> Self {
        FareRepository { pool }
    }

    /// Lists a company's fares, newest first.
    pub async fn list(&self, company_id: &str) -> DbResult<Vec<Fare>> {
        let fares = sqlx::query_as::<_, Fare>(&format!(
            "SELECT {FARE_COLUMNS} FROM fares
             WHERE company_id = ?1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id ASC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(company_id = %company_id, count = fares.len(), "Listed fares");
        Ok(fares)
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Fare>> {
        let fare = sqlx::query_as::<_, Fare>(&format!(
            "SELECT {FARE_COLUMNS} FROM fares
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fare)
    }

    pub async fn insert(&self, fare: &Fare) -> DbResult<Fare> {
        debug!(route_name = %fare.route_name, "Inserting fare");

        sqlx::query(
            "INSERT INTO fares (id, company_id, route_name, origin, destination, fare_amount,
                                currency, discount_percent, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&fare.id)
        .bind(&fare.company_id)
        .bind(&fare.route_name)
        .bind(&fare.origin)
        .bind(&fare.destination)
        .bind(fare.fare_amount)
        .bind(&fare.currency)
        .bind(fare.discount_percent)
        .bind(fare.status)
        .bind(fare.created_at)
        .bind(fare.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(fare.clone())
    }

    /// Overwrites every editable column. Last write wins.
    pub async fn update(&self, fare: &Fare) -> DbResult<()> {
        debug!(id = %fare.id, "Updating fare");

        let result = sqlx::query(
            "UPDATE fares SET
                route_name = ?3,
                origin = ?4,
                destination = ?5,
                fare_amount = ?6,
                currency = ?7,
                discount_percent = ?8,
                status = ?9,
                updated_at = ?10
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(&fare.id)
        .bind(&fare.company_id)
        .bind(&fare.route_name)
        .bind(&fare.origin)
        .bind(&fare.destination)
        .bind(fare.fare_amount)
        .bind(&fare.currency)
        .bind(fare.discount_percent)
        .bind(fare.status)
        .bind(fare.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Fare", &fare.id));
        }

        Ok(())
    }

    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting fare");

        let result = sqlx::query(
            "UPDATE fares SET deleted_at = ?3
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Fare", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
