//! Health check entity and the live-update wire message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted health check row — the outcome of one timed probe.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthCheck {
    /// Unique check identifier.
    pub id: Uuid,
    /// The site that was probed.
    pub site_id: Uuid,
    /// HTTP status code, `None` when no response was received.
    pub status_code: Option<i32>,
    /// Wall-clock latency of the probe in milliseconds.
    pub response_time_ms: i32,
    /// Whether the site answered with a success-class status in time.
    pub is_up: bool,
    /// When the check completed.
    pub checked_at: DateTime<Utc>,
}

/// The outcome of one probe attempt, before persistence.
///
/// Created exactly once per probe; the database assigns `id` and
/// `checked_at` on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthCheck {
    /// The site that was probed.
    pub site_id: Uuid,
    /// Observed HTTP status, `None` on timeout or transport failure.
    pub status_code: Option<i32>,
    /// Elapsed time from send to completion or failure, in milliseconds.
    pub response_time_ms: i32,
    /// Reachability verdict.
    pub is_up: bool,
}

impl NewHealthCheck {
    /// A successful response within the timeout.
    pub fn up(site_id: Uuid, status_code: u16, response_time_ms: i32) -> Self {
        Self {
            site_id,
            status_code: Some(i32::from(status_code)),
            response_time_ms,
            is_up: (200..300).contains(&status_code),
        }
    }

    /// No usable response: timeout, refused connection, or transport error.
    pub fn down(site_id: Uuid, response_time_ms: i32) -> Self {
        Self {
            site_id,
            status_code: None,
            response_time_ms,
            is_up: false,
        }
    }
}

/// JSON message pushed to a site owner's live session after each
/// persisted check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckUpdate {
    /// The site this update is about.
    pub site_id: Uuid,
    /// Reachability verdict.
    pub is_up: bool,
    /// Probe latency in milliseconds.
    pub response_time_ms: i32,
    /// Observed HTTP status, `null` when absent.
    pub status_code: Option<i32>,
    /// When the check completed.
    pub checked_at: DateTime<Utc>,
}

impl From<&HealthCheck> for CheckUpdate {
    fn from(check: &HealthCheck) -> Self {
        Self {
            site_id: check.site_id,
            is_up: check.is_up,
            response_time_ms: check.response_time_ms,
            status_code: check.status_code,
            checked_at: check.checked_at,
        }
    }
}
