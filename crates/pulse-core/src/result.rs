//! Convenience result type alias for SitePulse.

use crate::error::AppError;

/// A specialized `Result` type for SitePulse operations.
pub type AppResult<T> = Result<T, AppError>;
