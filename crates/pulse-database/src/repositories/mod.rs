//! Concrete repository implementations.

pub mod health_check;
pub mod site;
pub mod user;

pub use health_check::HealthCheckRepository;
pub use site::SiteRepository;
pub use user::UserRepository;

use async_trait::async_trait;
use sqlx::PgPool;

use pulse_core::result::AppResult;
use pulse_core::traits::SiteStore;
use pulse_entity::{HealthCheck, NewHealthCheck, Site};

/// Postgres-backed [`SiteStore`] handed to the check cycle.
///
/// Thin facade over the site and health check repositories so the monitor
/// crate never sees sqlx types.
#[derive(Debug, Clone)]
pub struct PgSiteStore {
    sites: SiteRepository,
    checks: HealthCheckRepository,
}

impl PgSiteStore {
    /// Create a new store facade over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            sites: SiteRepository::new(pool.clone()),
            checks: HealthCheckRepository::new(pool),
        }
    }
}

#[async_trait]
impl SiteStore for PgSiteStore {
    async fn list_all_sites(&self) -> AppResult<Vec<Site>> {
        self.sites.find_all().await
    }

    async fn create_health_check(&self, check: &NewHealthCheck) -> AppResult<HealthCheck> {
        self.checks.create(check).await
    }
}
