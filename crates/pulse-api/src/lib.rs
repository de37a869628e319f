//! # pulse-api
//!
//! The outward-facing surface of SitePulse: REST endpoints for account
//! registration, login, and site management, plus the authenticated
//! WebSocket upgrade that hands connections to the realtime hub.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
