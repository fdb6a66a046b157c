//! # Trip Repository
//!
//! Weekdays are stored as a JSON array (`["Monday","Friday"]`), the two
//! departure timestamps as separate columns.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use busdesk_core::{Trip, TripStatus};

const TRIP_COLUMNS: &str = "id, company_id, trip_name, bus_id, bus_name, route_id, route_name, \
                            departure_to, departure_from, days_of_week, status, \
                            created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: SqlitePool,
}

impl TripRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TripRepository { pool }
    }

    /// Lists a company's trips, newest first.
    pub async fn list(&self, company_id: &str) -> DbResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips
             WHERE company_id = ?1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id ASC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trip)
    }

    /// Active trips already assigned to a bus, for the double-booking check.
    pub async fn active_for_bus(&self, company_id: &str, bus_id: &str) -> DbResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips
             WHERE company_id = ?1 AND bus_id = ?2 AND status = ?3 AND deleted_at IS NULL"
        ))
        .bind(company_id)
        .bind(bus_id)
        .bind(TripStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        debug!(bus_id = %bus_id, count = trips.len(), "Loaded active trips for bus");
        Ok(trips)
    }

    pub async fn insert(&self, trip: &Trip) -> DbResult<Trip> {
        debug!(trip_name = %trip.trip_name, bus_id = %trip.bus_id, "Inserting trip");

        sqlx::query(
            "INSERT INTO trips (id, company_id, trip_name, bus_id, bus_name, route_id, route_name,
                                departure_to, departure_from, days_of_week, status,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&trip.id)
        .bind(&trip.company_id)
        .bind(&trip.trip_name)
        .bind(&trip.bus_id)
        .bind(&trip.bus_name)
        .bind(&trip.route_id)
        .bind(&trip.route_name)
        .bind(trip.departure_times.to)
        .bind(trip.departure_times.from)
        .bind(Json(&trip.days_of_week))
        .bind(trip.status)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(trip.clone())
    }

    /// Overwrites every editable column. Last write wins.
    pub async fn update(&self, trip: &Trip) -> DbResult<()> {
        debug!(id = %trip.id, "Updating trip");

        let result = sqlx::query(
            "UPDATE trips SET
                trip_name = ?3,
                bus_id = ?4,
                bus_name = ?5,
                route_id = ?6,
                route_name = ?7,
                departure_to = ?8,
                departure_from = ?9,
                days_of_week = ?10,
                status = ?11,
                updated_at = ?12
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(&trip.id)
        .bind(&trip.company_id)
        .bind(&trip.trip_name)
        .bind(&trip.bus_id)
        .bind(&trip.bus_name)
        .bind(&trip.route_id)
        .bind(&trip.route_name)
        .bind(trip.departure_times.to)
        .bind(trip.departure_times.from)
        .bind(Json(&trip.days_of_week))
        .bind(trip.status)
        .bind(trip.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Trip", &trip.id));
        }

        Ok(())
    }

    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting trip");

        let result = sqlx::query(
            "UPDATE trips SET deleted_at = ?3
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Trip", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
