//! # pulse-monitor
//!
//! The background half of SitePulse: every cycle the
//! [`controller::CycleController`] snapshots all registered sites,
//! probes them concurrently through the [`pool`] with a bounded worker
//! count, persists each outcome, and pushes a live update to the owning
//! user's session via the notification hub.

pub mod controller;
pub mod pool;
pub mod probe;

pub use controller::CycleController;
pub use probe::SiteProber;
