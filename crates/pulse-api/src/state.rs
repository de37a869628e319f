//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use pulse_auth::jwt::decoder::JwtDecoder;
use pulse_auth::jwt::encoder::JwtEncoder;
use pulse_auth::password::hasher::PasswordHasher;
use pulse_core::config::AppConfig;
use pulse_database::repositories::{HealthCheckRepository, SiteRepository, UserRepository};
use pulse_realtime::NotificationHub;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped (or internally pooled) for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    /// JWT token encoder.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2id).
    pub password_hasher: Arc<PasswordHasher>,

    /// User repository.
    pub user_repo: Arc<UserRepository>,
    /// Site repository.
    pub site_repo: Arc<SiteRepository>,
    /// Health check repository.
    pub check_repo: Arc<HealthCheckRepository>,

    /// Live notification hub shared with the check cycle.
    pub hub: Arc<NotificationHub>,
}

impl AppState {
    /// Assemble the full state from configuration, a connected pool, and
    /// the hub instance shared with the monitoring side.
    pub fn new(config: Arc<AppConfig>, db_pool: PgPool, hub: Arc<NotificationHub>) -> Self {
        Self {
            jwt_encoder: Arc::new(JwtEncoder::new(&config.auth)),
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            password_hasher: Arc::new(PasswordHasher::new()),
            user_repo: Arc::new(UserRepository::new(db_pool.clone())),
            site_repo: Arc::new(SiteRepository::new(db_pool.clone())),
            check_repo: Arc::new(HealthCheckRepository::new(db_pool.clone())),
            config,
            db_pool,
            hub,
        }
    }
}
