//! Site repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use pulse_core::error::{AppError, ErrorKind};
use pulse_core::result::AppResult;
use pulse_entity::site::{NewSite, Site};

/// Repository for site CRUD and query operations.
#[derive(Debug, Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    /// Create a new site repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new site and return the stored row.
    pub async fn create(&self, site: &NewSite) -> AppResult<Site> {
        sqlx::query_as::<_, Site>(
            "INSERT INTO sites (user_id, url) VALUES ($1, $2) \
             RETURNING id, user_id, url, created_at",
        )
        .bind(site.user_id)
        .bind(&site.url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create site", e))
    }

    /// Snapshot of every registered site, consumed once per check cycle.
    pub async fn find_all(&self) -> AppResult<Vec<Site>> {
        sqlx::query_as::<_, Site>("SELECT * FROM sites")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sites", e))
    }

    /// Find a site by ID.
    pub async fn find_by_id(&self, site_id: Uuid) -> AppResult<Option<Site>> {
        sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = $1")
            .bind(site_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find site", e))
    }

    /// List a user's sites, newest first.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Site>> {
        sqlx::query_as::<_, Site>(
            "SELECT * FROM sites WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user sites", e))
    }

    /// Delete a site, scoped to its owner. Returns `true` if a row was
    /// removed.
    pub async fn delete(&self, site_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sites WHERE id = $1 AND user_id = $2")
            .bind(site_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete site", e))?;

        Ok(result.rows_affected() > 0)
    }
}
