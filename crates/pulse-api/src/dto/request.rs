//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password. Minimum length is enforced against configuration in the
    /// handler.
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Site registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSiteRequest {
    /// URL to monitor.
    #[validate(url(message = "Invalid URL"))]
    pub url: String,
}

/// Query parameters for the check history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecksQuery {
    /// Maximum number of checks to return (newest first).
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_bad_email() {
        let req = RegisterRequest {
            username: "alice".into(),
            email: "not-an-email".into(),
            password: "hunter42".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_site_rejects_non_url() {
        let req = CreateSiteRequest {
            url: "not a url".into(),
        };
        assert!(req.validate().is_err());

        let req = CreateSiteRequest {
            url: "https://example.com/status".into(),
        };
        assert!(req.validate().is_ok());
    }
}
