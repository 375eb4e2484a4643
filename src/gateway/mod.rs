pub mod dispatcher;
pub mod events;
pub mod heartbeat;
pub mod router;
pub mod session;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::time::{interval_at, Instant};

use crate::state::AppState;
use heartbeat::Heartbeat;
use router::BroadcastRouter;

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.chat, state.heartbeat))
}

async fn handle_socket(socket: WebSocket, chat: Arc<BroadcastRouter>, timing: Heartbeat) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let (mut session, mut outbound) = chat.dispatcher().open_session();
    let session_id = session.id();
    tracing::debug!(session_id = %session_id, "connection opened");

    let mut last_seen = Instant::now();
    let mut heartbeat = interval_at(Instant::now() + timing.interval, timing.interval);

    loop {
        tokio::select! {
            // Events queued for this connection by the dispatcher
            Some(frame) = outbound.recv() => {
                if ws_sink.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > timing.timeout {
                    tracing::debug!(session_id = %session_id, "heartbeat timed out");
                    break;
                }
                if ws_sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        last_seen = Instant::now();
                        match session.interpret(text.as_str()) {
                            Ok(event) => chat.handle(&mut session, event),
                            Err(_) => {
                                tracing::trace!(
                                    session_id = %session_id,
                                    "dropping unrecognized frame"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => last_seen = Instant::now(),
                }
            }
        }
    }

    chat.disconnect(&mut session);
    tracing::debug!(session_id = %session_id, "connection closed");
}
