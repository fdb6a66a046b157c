//! # Stop Repository
//!
//! Stops are the vocabulary the route resolver checks names against.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use busdesk_core::{Stop, StopDirectory};

const STOP_COLUMNS: &str = "id, company_id, name, stop_type, district, created_at, updated_at";

/// Repository for stop database operations.
#[derive(Debug, Clone)]
pub struct StopRepository {
    pool: SqlitePool,
}

impl StopRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StopRepository { pool }
    }

    /// Lists a company's stops by name.
    pub async fn list(&self, company_id: &str) -> DbResult<Vec<Stop>> {
        let stops = sqlx::query_as::<_, Stop>(&format!(
            "SELECT {STOP_COLUMNS} FROM stops
             WHERE company_id = ?1 AND deleted_at IS NULL
             ORDER BY name"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Stop>> {
        let stop = sqlx::query_as::<_, Stop>(&format!(
            "SELECT {STOP_COLUMNS} FROM stops
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stop)
    }

    /// Loads every stop name of a company into a resolver.
    pub async fn directory(&self, company_id: &str) -> DbResult<StopDirectory> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM stops WHERE company_id = ?1 AND deleted_at IS NULL",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(company_id = %company_id, count = names.len(), "Loaded stop directory");
        Ok(StopDirectory::new(names))
    }

    /// Inserts a new stop.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the company already has a stop with this name
    pub async fn insert(&self, stop: &Stop) -> DbResult<Stop> {
        debug!(name = %stop.name, "Inserting stop");

        sqlx::query(
            "INSERT INTO stops (id, company_id, name, stop_type, district, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&stop.id)
        .bind(&stop.company_id)
        .bind(&stop.name)
        .bind(&stop.stop_type)
        .bind(&stop.district)
        .bind(stop.created_at)
        .bind(stop.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("name", &stop.name),
            other => other,
        })?;

        Ok(stop.clone())
    }

    /// Updates name, type and district.
    pub async fn update(&self, stop: &Stop) -> DbResult<()> {
        debug!(id = %stop.id, "Updating stop");

        let result = sqlx::query(
            "UPDATE stops SET name = ?3, stop_type = ?4, district = ?5, updated_at = ?6
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(&stop.id)
        .bind(&stop.company_id)
        .bind(&stop.name)
        .bind(&stop.stop_type)
        .bind(&stop.district)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("name", &stop.name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stop", &stop.id));
        }

        Ok(())
    }

    /// Soft-deletes a stop. Fares and routes that name it keep the name.
    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting stop");

        let result = sqlx::query(
            "UPDATE stops SET deleted_at = ?3
             WHERE id = ?1 AND company_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stop", id));
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
    use uuid::Uuid;

    fn stop(company: &str, name: &str) -> Stop {
        let now = Utc::now();
        Stop {
            id: Uuid::new_v4().to_string(),
            company_id: company.to_string(),
            name: name.to_string(),
            stop_type: "terminal".to_string(),
            district: "Dhaka".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_list_and_directory() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stops();

        repo.insert(&stop("c-1", "Sylhet")).await.unwrap();
        repo.insert(&stop("c-1", "Dhaka")).await.unwrap();
        repo.insert(&stop("c-2", "Khulna")).await.unwrap();

        let names: Vec<String> = repo.list("c-1").await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Dhaka", "Sylhet"]);

        let dir = repo.directory("c-1").await.unwrap();
        assert_eq!(dir.resolve("Dhaka", "Sylhet").unwrap(), "Dhaka - Sylhet");
        assert!(dir.resolve("Dhaka", "Khulna").is_err());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stops();

        repo.insert(&stop("c-1", "Dhaka")).await.unwrap();
        let err = repo.insert(&stop("c-1", "Dhaka")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Same name is fine for another company
        repo.insert(&stop("c-2", "Dhaka")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_and_soft_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stops();

        let mut s = stop("c-1", "Comila");
        repo.insert(&s).await.unwrap();

        s.name = "Comilla".to_string();
        repo.update(&s).await.unwrap();
        let fetched = repo.get_by_id("c-1", &s.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Comilla");

        // Other companies cannot touch it
        assert!(repo.delete("c-2", &s.id).await.is_err());

        repo.delete("c-1", &s.id).await.unwrap();
        assert!(repo.get_by_id("c-1", &s.id).await.unwrap().is_none());
        assert!(repo.list("c-1").await.unwrap().is_empty());
        assert!(matches!(
            repo.delete("c-1", &s.id).await,
            Err(DbError::NotFound { .. })
        ));

        // The name is free again after deletion
        repo.insert(&stop("c-1", "Comilla")).await.unwrap();
    }
}
