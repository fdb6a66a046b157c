//! # Route Repository
//!
//! Routes store their intermediate stops as a JSON array of names.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use busdesk_core::Route;

const ROUTE_COLUMNS: &str = "id, company_id, route_name, origin, destination, stops, \
                             distance_km, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RouteRepository {
    pool: SqlitePool,
}

impl RouteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RouteRepository { pool }
    }

    /// Lists a company's routes, newest first.
    pub async fn list(&self, company_id: &str) -> DbResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes
             WHERE company_id = ?1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id ASC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn insert(&self, route: &Route) -> DbResult<Route> {
        debug!(route_name = %route.route_name, "Inserting route");

        sqlx::query(
            "INSERT INTO routes (id, company_id, route_name, origin, destination, stops,
                                 distance_km, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&route.id)
        .bind(&route.company_id)
        .bind(&route.route_name)
        .bind(&route.origin)
        .bind(&route.destination)
        .bind(Json(&route.stops))
        .bind(route.distance_km)
        .bind(route.status)
        .bind(route.created_at)
        .bind(route.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(route.clone())
    }

    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting route");

        let result = sqlx::query(
            "UPDATE routes SET deleted_at = ?3
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Route", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use busdesk_core::RouteStatus;

    #[tokio::test]
    async fn test_route_stops_round_trip_through_json_column() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.routes();
        let now = Utc::now();

        let route = Route {
            id: "r-1".to_string(),
            company_id: "c-1".to_string(),
            route_name: "Dhaka - Chittagong".to_string(),
            origin: "Dhaka".to_string(),
            destination: "Chittagong".to_string(),
            stops: vec!["Narayanganj".to_string(), "Comilla".to_string()],
            distance_km: Some(244.0),
            status: RouteStatus::Active,
            created_at: now,
            updated_at: now,
        };
        repo.insert(&route).await.unwrap();

        let fetched = repo.get_by_id("c-1", "r-1").await.unwrap().unwrap();
        assert_eq!(fetched.stops, route.stops);
        assert_eq!(fetched.distance_km, Some(244.0));
        assert_eq!(fetched.path(), vec!["Dhaka", "Narayanganj", "Comilla", "Chittagong"]);

        assert!(repo.get_by_id("c-2", "r-1").await.unwrap().is_none());

        repo.delete("c-1", "r-1").await.unwrap();
        assert!(repo.list("c-1").await.unwrap().is_empty());
    }
}
