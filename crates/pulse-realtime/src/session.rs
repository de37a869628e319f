//! Delivery session pumps.
//!
//! A session is two halves bound to one WebSocket: a read pump that
//! drains inbound frames only to detect peer closure or idle death, and
//! a write pump that drains the session's outbound queue FIFO and emits
//! keepalive pings. Either half ending tears the whole session down and
//! unregisters it from the hub.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use pulse_core::config::realtime::RealtimeConfig;

use crate::hub::NotificationHub;

/// Drive one authenticated WebSocket connection until it dies.
///
/// Registers with the hub (evicting any previous session for the user),
/// runs both pumps concurrently, and unregisters when the first of them
/// finishes. Dropping the socket halves afterwards closes the transport,
/// which also terminates the surviving pump's peer side.
pub async fn run_session(
    socket: WebSocket,
    user_id: Uuid,
    hub: Arc<NotificationHub>,
    config: &RealtimeConfig,
) {
    let (handle, queue) = hub.register(user_id);
    info!(user_id = %user_id, session_id = %handle.session_id, "Delivery session started");

    let (ws_tx, ws_rx) = socket.split();
    let writer = write_pump(
        ws_tx,
        queue,
        Duration::from_secs(config.ping_interval_seconds),
    );
    let reader = read_pump(ws_rx, Duration::from_secs(config.idle_timeout_seconds));
    tokio::pin!(writer, reader);

    tokio::select! {
        _ = &mut writer => {}
        _ = &mut reader => {}
    }

    hub.unregister(&handle);
    info!(user_id = %user_id, session_id = %handle.session_id, "Delivery session ended");
}

/// Drain the outbound queue to the transport, FIFO.
///
/// Sends a keepalive ping whenever `ping_interval` elapses without a
/// payload write. A closed queue (unregistered or evicted session) sends
/// a best-effort close notice and returns; a transport error returns
/// immediately.
async fn write_pump<S>(mut transport: S, mut queue: mpsc::Receiver<String>, ping_interval: Duration)
where
    S: Sink<Message> + Unpin,
{
    let mut ticker = interval_at(Instant::now() + ping_interval, ping_interval);

    loop {
        tokio::select! {
            payload = queue.recv() => match payload {
                Some(text) => {
                    if transport.send(Message::Text(text.into())).await.is_err() {
                        warn!("Transport write failed, ending session writer");
                        return;
                    }
                    ticker.reset();
                }
                None => {
                    // Queue closed by the hub; tell the peer goodbye if
                    // the transport still accepts it.
                    let _ = transport.send(Message::Close(None)).await;
                    return;
                }
            },
            _ = ticker.tick() => {
                if transport.send(Message::Ping(Bytes::new())).await.is_err() {
                    warn!("Keepalive ping failed, ending session writer");
                    return;
                }
            }
        }
    }
}

/// Drain inbound frames solely for liveness.
///
/// Any inbound frame (including pong replies to our pings) resets the
/// idle deadline. Returns on peer close, transport error, stream end, or
/// `idle_timeout` of silence.
async fn read_pump<R, E>(mut transport: R, idle_timeout: Duration)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    loop {
        match timeout(idle_timeout, transport.next()).await {
            Err(_) => {
                debug!("Session idle timeout reached");
                return;
            }
            Ok(None) => return,
            Ok(Some(Err(_))) => {
                debug!("Transport read error, ending session reader");
                return;
            }
            Ok(Some(Ok(Message::Close(_)))) => return,
            // Payload content from clients is ignored; receiving it only
            // proves the peer is alive.
            Ok(Some(Ok(_))) => {}
        }
    }
}
