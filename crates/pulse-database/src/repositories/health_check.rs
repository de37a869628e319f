//! Health check repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use pulse_core::error::{AppError, ErrorKind};
use pulse_core::result::AppResult;
use pulse_entity::check::{HealthCheck, NewHealthCheck};

/// Repository for probe result persistence and history reads.
#[derive(Debug, Clone)]
pub struct HealthCheckRepository {
    pool: PgPool,
}

impl HealthCheckRepository {
    /// Create a new health check repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one probe outcome and return the stored row with its
    /// database-assigned `id` and `checked_at`.
    pub async fn create(&self, check: &NewHealthCheck) -> AppResult<HealthCheck> {
        sqlx::query_as::<_, HealthCheck>(
            "INSERT INTO health_checks (site_id, status_code, response_time_ms, is_up) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, site_id, status_code, response_time_ms, is_up, checked_at",
        )
        .bind(check.site_id)
        .bind(check.status_code)
        .bind(check.response_time_ms)
        .bind(check.is_up)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create health check", e)
        })
    }

    /// Most recent checks for one site, newest first.
    pub async fn find_recent_by_site(
        &self,
        site_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<HealthCheck>> {
        sqlx::query_as::<_, HealthCheck>(
            "SELECT * FROM health_checks WHERE site_id = $1 \
             ORDER BY checked_at DESC LIMIT $2",
        )
        .bind(site_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list health checks", e)
        })
    }
}
