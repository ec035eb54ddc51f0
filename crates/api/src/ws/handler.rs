use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use fuzzhub_core::types::JobId;
use fuzzhub_events::{TerminalEvent, TerminalHub};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::state::AppState;

/// Interval between heartbeat pings.
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Control messages a client may send on the terminal socket.
///
/// Currently only `{"type": "subscribe", "jobId": <id>}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientMessage {
    Subscribe {
        #[serde(rename = "jobId")]
        job_id: JobId,
    },
}

/// HTTP handler that upgrades the connection to a terminal WebSocket.
///
/// After the upgrade the connection is driven by [`handle_socket`]: a
/// spawned sender task forwards hub events (and heartbeat pings) to the
/// sink while the current task processes inbound control messages.
pub async fn terminal_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Manage a single terminal connection after upgrade.
///
/// 1. Allocates a connection id and an event channel.
/// 2. Spawns a sender task forwarding hub events to the sink as JSON text,
///    interleaved with periodic Ping frames.
/// 3. Processes inbound messages on the current task; a `subscribe` control
///    message registers the connection with the hub.
/// 4. Unsubscribes and tears down on disconnect.
async fn handle_socket(socket: WebSocket, hub: Arc<TerminalHub>) {
    let conn_id = Uuid::new_v4();
    tracing::info!(conn_id = %conn_id, "Terminal WebSocket connected");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TerminalEvent>();
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id;
    let send_task = tokio::spawn(async move {
        let mut heartbeat =
            tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        heartbeat.tick().await; // the first tick fires immediately

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else { break };
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::error!(conn_id = %sender_conn_id, error = %e, "Event serialization failed");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(payload.into())).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "Terminal WebSocket sink closed");
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Receiver loop: process inbound control messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Subscribe { job_id }) => {
                    tracing::info!(conn_id = %conn_id, job_id, "Terminal subscribe");
                    hub.subscribe(conn_id, job_id, event_tx.clone()).await;
                }
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring malformed terminal message");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Terminal WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: detach from the hub and stop the sender task.
    hub.unsubscribe(conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Terminal WebSocket disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_message_parses_job_id() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "subscribe", "jobId": 7}"#).unwrap();
        let ClientMessage::Subscribe { job_id } = msg;
        assert_eq!(job_id, 7);
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"type": "shout", "jobId": 7}"#);
        assert!(result.is_err());
    }
}
