//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_entity::{HealthCheck, Site, User};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login/registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed access token.
    pub access_token: String,
    /// Access token expiration.
    pub expires_at: DateTime<Utc>,
    /// Authenticated user.
    pub user: UserResponse,
}

/// User summary for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Monitored site for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteResponse {
    /// Site ID.
    pub id: Uuid,
    /// Monitored URL.
    pub url: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<&Site> for SiteResponse {
    fn from(site: &Site) -> Self {
        Self {
            id: site.id,
            url: site.url.clone(),
            created_at: site.created_at,
        }
    }
}

/// One historical check for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Check ID.
    pub id: Uuid,
    /// HTTP status, `null` when no response arrived.
    pub status_code: Option<i32>,
    /// Probe latency in milliseconds.
    pub response_time_ms: i32,
    /// Reachability verdict.
    pub is_up: bool,
    /// When the check completed.
    pub checked_at: DateTime<Utc>,
}

impl From<&HealthCheck> for CheckResponse {
    fn from(check: &HealthCheck) -> Self {
        Self {
            id: check.id,
            status_code: check.status_code,
            response_time_ms: check.response_time_ms,
            is_up: check.is_up,
            checked_at: check.checked_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}
