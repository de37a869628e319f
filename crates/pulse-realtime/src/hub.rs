//! Per-user session registry and payload routing.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pulse_core::config::realtime::RealtimeConfig;

/// Identifies one registered session so that a late unregister from a
/// replaced connection cannot evict its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    /// Unique per-connection identifier.
    pub session_id: Uuid,
    /// The authenticated user this session delivers to.
    pub user_id: Uuid,
}

/// One registry entry: the live session's outbound queue sender.
///
/// Dropping the entry drops the only sender, which closes the queue and
/// wakes the session's write pump.
#[derive(Debug)]
struct SessionEntry {
    session_id: Uuid,
    tx: mpsc::Sender<String>,
}

/// Process-wide registry of at most one live delivery session per user.
///
/// All mutations (register, unregister, route-triggered eviction) go
/// through the single internal mutex, so operations on the same user's
/// entry can never interleave.
#[derive(Debug)]
pub struct NotificationHub {
    registry: Mutex<HashMap<Uuid, SessionEntry>>,
    queue_capacity: usize,
}

impl NotificationHub {
    /// Create an empty hub.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            queue_capacity: config.send_queue_capacity,
        }
    }

    /// Register a new session for `user_id`.
    ///
    /// Any session already registered for that user is evicted: its queue
    /// is closed (terminating its write pump) and its registry entry is
    /// replaced atomically with the installation of the new one.
    ///
    /// Returns the handle identifying the new session and the receiving
    /// end of its outbound queue.
    pub fn register(&self, user_id: Uuid) -> (SessionHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let handle = SessionHandle {
            session_id: Uuid::new_v4(),
            user_id,
        };

        let evicted = self.registry.lock().expect("hub registry poisoned").insert(
            user_id,
            SessionEntry {
                session_id: handle.session_id,
                tx,
            },
        );

        if let Some(old) = evicted {
            info!(
                user_id = %user_id,
                old_session = %old.session_id,
                "Evicted previous session for user"
            );
        }
        info!(user_id = %user_id, session_id = %handle.session_id, "Session registered");

        (handle, rx)
    }

    /// Remove `handle`'s session from the registry and close its queue.
    ///
    /// A no-op if the user's registered session is not the one identified
    /// by `handle` — a replaced session unregistering late must not evict
    /// the session that replaced it.
    pub fn unregister(&self, handle: &SessionHandle) {
        let mut registry = self.registry.lock().expect("hub registry poisoned");
        let current = registry
            .get(&handle.user_id)
            .is_some_and(|entry| entry.session_id == handle.session_id);
        if current {
            registry.remove(&handle.user_id);
            info!(
                user_id = %handle.user_id,
                session_id = %handle.session_id,
                "Session unregistered"
            );
        }
    }

    /// Route a serialized payload to `user_id`'s session, if any.
    ///
    /// Never blocks: the payload is enqueued with `try_send`. A full
    /// queue marks the session unhealthy, so it is evicted and its queue
    /// closed instead of stalling the caller. No registered session means
    /// the payload is dropped — delivery is best-effort.
    pub fn route(&self, user_id: Uuid, payload: String) {
        let mut registry = self.registry.lock().expect("hub registry poisoned");
        let Some(entry) = registry.get(&user_id) else {
            debug!(user_id = %user_id, "No live session, dropping update");
            return;
        };

        match entry.tx.try_send(payload) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    user_id = %user_id,
                    session_id = %entry.session_id,
                    "Outbound queue full, evicting session"
                );
                registry.remove(&user_id);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // Writer already gone; drop the stale entry.
                registry.remove(&user_id);
            }
        }
    }

    /// Whether a session is currently registered for `user_id`.
    pub fn is_registered(&self, user_id: Uuid) -> bool {
        self.registry
            .lock()
            .expect("hub registry poisoned")
            .contains_key(&user_id)
    }

    /// Number of currently registered sessions.
    pub fn session_count(&self) -> usize {
        self.registry.lock().expect("hub registry poisoned").len()
    }
}
