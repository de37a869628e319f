//! # pulse-core
//!
//! Core crate for SitePulse. Contains the unified error system,
//! configuration schemas, and the store traits that decouple the
//! monitoring cycle from the concrete database layer.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
