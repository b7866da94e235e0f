//! `WebSocket` handler for change subscriptions.
//!
//! Clients connect to `GET /ws/{topic}`, e.g. `/ws/eventCreated`, and
//! receive one JSON text frame per change published on that topic after
//! they connected:
//!
//! ```json
//! { "topic": "eventCreated", "record": { ... }, "published_at": "..." }
//! ```
//!
//! The subscription lives exactly as long as the connection. When the
//! client goes away the subscription is dropped and the listener is
//! released.

use std::fmt::Display;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use eventboard_core::Subscription;
use eventboard_types::{Change, Topic, UnknownTopic};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Validate the topic, then upgrade the connection and begin streaming
/// changes.
///
/// # Route
///
/// `GET /ws/{topic}`
///
/// # Errors
///
/// Returns [`ApiError::InvalidTopic`] if `topic` is not one of the twelve
/// topic names. The topic is checked before the upgrade so that a bad
/// name is reported as a plain `400` response.
#[allow(clippy::unused_async)]
pub async fn ws_topic(
    Path(topic): Path<String>,
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let topic: Topic = topic
        .parse()
        .map_err(|err: UnknownTopic| ApiError::InvalidTopic(err.0))?;
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    // Subscribe before the handshake completes so nothing published
    // after the upgrade is missed.
    let subscription = state.board.notifier().subscribe(topic);
    Ok(ws
        .on_upgrade(move |socket| handle_ws(socket, subscription))
        .into_response())
}

/// Encode a change as a `WebSocket` text frame payload.
///
/// # Errors
///
/// Returns [`ApiError::Serialization`] if the record cannot be serialized.
pub fn encode_change(change: &Change) -> Result<String, ApiError> {
    Ok(serde_json::to_string(change)?)
}

/// Split an upgraded socket and forward changes over it.
async fn handle_ws(socket: WebSocket, subscription: Subscription) {
    let (sink, stream) = socket.split();
    forward(sink, stream, subscription).await;
}

/// Forward changes from `subscription` to `sink` until either side
/// closes.
///
/// `stream` carries the frames the client sends. Pings are answered with
/// pongs; a close frame, the end of the stream, or a receive error ends
/// the loop. The subscription is dropped on return, which releases the
/// listener.
pub async fn forward<Tx, Rx, E>(mut sink: Tx, mut stream: Rx, mut subscription: Subscription)
where
    Tx: Sink<Message> + Unpin,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let topic = subscription.topic();
    debug!(%topic, "WebSocket subscriber connected");

    loop {
        tokio::select! {
            // Receive the next change published on the topic.
            change = subscription.recv_change() => {
                let Some(change) = change else {
                    debug!(%topic, "notifier closed, shutting down WebSocket");
                    return;
                };
                let json = match encode_change(&change) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!(%topic, "dropping change: {e}");
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    debug!(%topic, "WebSocket subscriber disconnected (send failed)");
                    return;
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%topic, "WebSocket subscriber disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sink.send(Message::Pong(data)).await.is_err() {
                            debug!(%topic, "WebSocket subscriber disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(%topic, "WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Clients have nothing to send; ignore text and binary frames.
                    }
                }
            }
        }
    }
}
