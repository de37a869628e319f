//! # pulse-entity
//!
//! Domain entity models for SitePulse. Every struct in this crate
//! represents a database table row or a wire-level value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! persisted entities additionally derive `sqlx::FromRow`.
//!
//! This crate has **no** internal dependencies on other SitePulse crates.

pub mod check;
pub mod site;
pub mod user;

pub use check::{CheckUpdate, HealthCheck, NewHealthCheck};
pub use site::{NewSite, Site};
pub use user::{NewUser, User};
