//! Traits that decouple the core subsystems from their collaborators.

pub mod store;

pub use store::SiteStore;
