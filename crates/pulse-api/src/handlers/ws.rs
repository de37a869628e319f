//! WebSocket upgrade handler.

use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use serde::Deserialize;
use tracing::info;

use pulse_realtime::session;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
///
/// Browsers cannot set headers on WebSocket upgrades, so the token rides
/// in the query string.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade
///
/// The token is validated before the upgrade completes; a bad token is a
/// plain 401 and no socket is ever established.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let claims = state.jwt_decoder.decode_token(&query.token)?;
    let user_id = claims.user_id();

    info!(user_id = %user_id, "WebSocket upgrade authenticated");

    let hub = state.hub.clone();
    let realtime = state.config.realtime.clone();
    Ok(ws.on_upgrade(move |socket| async move {
        session::run_session(socket, user_id, hub, &realtime).await;
    }))
}
