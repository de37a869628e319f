//! Store trait consumed by the check cycle.

use async_trait::async_trait;

use pulse_entity::{HealthCheck, NewHealthCheck, Site};

use crate::result::AppResult;

/// The minimal persistence surface the check cycle depends on.
///
/// Implemented by the Postgres repositories in `pulse-database`; test code
/// substitutes in-memory fakes. The store is safe for concurrent use.
#[async_trait]
pub trait SiteStore: Send + Sync + 'static {
    /// Fetch a snapshot of every registered site.
    async fn list_all_sites(&self) -> AppResult<Vec<Site>>;

    /// Persist one probe outcome and return the stored row.
    async fn create_health_check(&self, check: &NewHealthCheck) -> AppResult<HealthCheck>;
}
