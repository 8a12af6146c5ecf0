//! WebSocket handler for chat connections.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::time::Duration;

use crate::api::AppState;

use super::hub::PeerId;

/// Ping interval for keepalive.
const PING_INTERVAL_SECS: u64 = 30;

/// Reserved keyword that flags a frame as a command instead of chat.
const COMMAND_KEYWORD: &str = "exchange";

/// WebSocket upgrade handler.
///
/// GET /ws
pub async fn ws_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    info!("WebSocket upgrade request from {addr}");
    ws.on_upgrade(move |socket| handle_chat_connection(socket, state, addr))
}

/// Drive one connection from registration to teardown.
async fn handle_chat_connection(socket: WebSocket, state: AppState, addr: SocketAddr) {
    let (mut sender, mut receiver) = socket.split();

    let (peer_id, peer_name, mut outbound_rx) = state.hub.register(addr);

    // Writer task owns the sink half: it drains the hub channel and keeps
    // the connection alive with periodic pings.
    let send_task = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(Duration::from_secs(PING_INTERVAL_SECS));

        loop {
            tokio::select! {
                frame = outbound_rx.recv() => {
                    let Some(text) = frame else { break };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }

                _ = ping_interval.tick() => {
                    if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Process incoming frames until the peer goes away.
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                dispatch_frame(&state, &peer_id, &peer_name, text.as_str()).await;
            }
            Ok(Message::Binary(_)) => {
                debug!("Ignoring binary frame from {peer_name}");
            }
            Ok(Message::Ping(_)) => {
                // Pong is sent by axum automatically.
                debug!("Received ping from {peer_name}");
            }
            Ok(Message::Pong(_)) => {
                debug!("Received pong from {peer_name}");
            }
            Ok(Message::Close(_)) => {
                info!("{peer_name} closed the connection");
                break;
            }
            Err(e) => {
                warn!("WebSocket error for {peer_name}: {e}");
                break;
            }
        }
    }

    // Clean up
    send_task.abort();
    state.hub.release(&peer_id);
}

/// Route one text frame: a reserved command gets a private reply, anything
/// else is broadcast to the room prefixed with the sender's name.
async fn dispatch_frame(state: &AppState, peer_id: &PeerId, peer_name: &str, text: &str) {
    match exchange_params(text) {
        Some(params) => {
            debug!("{peer_name} runs the {COMMAND_KEYWORD} command");
            let reply = state.exchange.execute(&params).await;
            state.hub.send_to(peer_id, reply).await;
        }
        None => {
            state.hub.broadcast(&format!("{peer_name}: {text}"));
        }
    }
}

/// Classify a frame. Returns the whitespace-split tokens after the keyword
/// when the frame is a command, `None` when it is chat.
///
/// Only the bare keyword or the keyword followed by whitespace counts, so
/// "exchanger 3" stays chat.
fn exchange_params(text: &str) -> Option<Vec<&str>> {
    if text == COMMAND_KEYWORD {
        return Some(Vec::new());
    }
    let rest = text.strip_prefix(COMMAND_KEYWORD)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.split_whitespace().collect())
    } else {
        None
    }
}
