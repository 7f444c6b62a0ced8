use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use bakery_core::types::DbId;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Serialize;

use crate::handlers::cart::{load_snapshot, CartSnapshot};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Outbound frame: `{"type":"cart","data":{...}}`.
#[derive(Debug, Serialize)]
struct CartFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a CartSnapshot,
}

/// GET /api/v1/ws/cart
///
/// Authenticates before the upgrade (browsers send the session cookie with
/// the handshake), then pushes the cart on connect and after every change.
pub async fn cart_ws_handler(
    RequireAuth(user): RequireAuth,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user.user_id))
}

async fn snapshot_message(state: &AppState, user_id: DbId) -> Option<Message> {
    let snapshot = match load_snapshot(state, user_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Cart snapshot failed");
            return None;
        }
    };
    let frame = CartFrame {
        kind: "cart",
        data: &snapshot,
    };
    match serde_json::to_string(&frame) {
        Ok(text) => Some(Message::Text(Utf8Bytes::from(text))),
        Err(e) => {
            tracing::error!(user_id, error = %e, "Cart snapshot serialization failed");
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: DbId) {
    let (sink, stream) = socket.split();
    run_cart_feed(sink, stream, state, user_id).await;
}

/// Drive one cart feed over an already-split connection.
///
/// The subscription lives exactly as long as the connection: it is created
/// before the first snapshot and dropped when either side closes.
pub async fn run_cart_feed<Tx, Rx>(mut sink: Tx, mut stream: Rx, state: AppState, user_id: DbId)
where
    Tx: Sink<Message> + Unpin,
    Rx: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut subscription = state.event_bus.subscribe_cart(user_id);
    tracing::info!(user_id, "Cart feed connected");

    if let Some(msg) = snapshot_message(&state, user_id).await {
        if sink.send(msg).await.is_err() {
            subscription.unsubscribe();
            return;
        }
    }

    loop {
        tokio::select! {
            changed = subscription.changed() => {
                if changed.is_none() {
                    tracing::debug!(user_id, "Event bus closed");
                    break;
                }
                let Some(msg) = snapshot_message(&state, user_id).await else {
                    continue;
                };
                if sink.send(msg).await.is_err() {
                    tracing::debug!(user_id, "Cart feed sink closed");
                    break;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(user_id, error = %e, "Cart feed receive error");
                    break;
                }
            },
        }
    }

    subscription.unsubscribe();
    tracing::info!(user_id, "Cart feed disconnected");
}
