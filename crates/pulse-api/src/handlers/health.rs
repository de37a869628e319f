//! Service health handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::error;

use pulse_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Health probe response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: String,
    /// Database connectivity.
    pub database: String,
}

/// GET /health
///
/// Answers 200 only when the database is reachable, so load balancers
/// stop routing to an instance that cannot serve data.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Health check database ping failed");
            AppError::new(ErrorKind::ServiceUnavailable, "Database unreachable")
        })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database: "up".to_string(),
    }))
}
