//! # pulse-realtime
//!
//! Live delivery of check updates to connected clients. The
//! [`hub::NotificationHub`] keeps at most one registered session per user
//! and routes serialized payloads onto that session's bounded outbound
//! queue without ever blocking the router; [`session`] contains the
//! read/write pumps that bind a registered session to its WebSocket.

pub mod hub;
pub mod session;

pub use hub::{NotificationHub, SessionHandle};
