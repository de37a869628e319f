//! Site entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A monitored network endpoint owned by a user.
///
/// Sites are immutable once created; the only mutation is deletion.
/// The check cycle consumes a read-only snapshot of all sites.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Site {
    /// Unique site identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Target URL probed each cycle.
    pub url: String,
    /// When the site was registered.
    pub created_at: DateTime<Utc>,
}

/// Data required to register a new site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSite {
    /// Owning user.
    pub user_id: Uuid,
    /// Target URL.
    pub url: String,
}
