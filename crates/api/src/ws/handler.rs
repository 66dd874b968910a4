use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use stayhub_core::error::CoreError;
use stayhub_core::types::DbId;
use stayhub_db::repositories::ConversationRepo;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the WebSocket upgrade request.
///
/// Browsers cannot set headers on WebSocket upgrades, so the access token
/// travels as a query parameter instead of an `Authorization` header.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// Inbound control frames sent by clients.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    /// Subscribe to a conversation's room.
    Join { conversation_id: DbId },
    /// Unsubscribe from a conversation's room.
    Leave { conversation_id: DbId },
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The token is validated before the upgrade; an invalid token fails the
/// request with 401 instead of opening a socket that can do nothing.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let claims = validate_token(&params.token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, claims.sub)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `RoomManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound join/leave frames on the current task.
///   4. Cleans up (connection and room memberships) on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let room_manager = Arc::clone(&state.room_manager);

    // Register and get the receiver for outbound messages.
    let mut rx = room_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_client_frame(&state, &conn_id, user_id, text.as_str()).await;
            }
            Ok(_msg) => {
                // Binary and other frame types carry no client commands.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection (leaves all rooms) and abort sender task.
    room_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}

/// Dispatch a parsed client frame.
///
/// A join is only honored when the user is a party to the conversation;
/// otherwise an error frame is pushed back on the connection. Malformed
/// frames are answered the same way and otherwise ignored.
async fn handle_client_frame(state: &AppState, conn_id: &str, user_id: DbId, text: &str) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable client frame");
            send_error(state, user_id, conn_id, "Unrecognized frame").await;
            return;
        }
    };

    match frame {
        ClientFrame::Join { conversation_id } => {
            let conversation =
                match ConversationRepo::find_by_id(&state.pool, conversation_id).await {
                    Ok(Some(c)) => c,
                    Ok(None) => {
                        send_error(state, user_id, conn_id, "Conversation not found").await;
                        return;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, conversation_id, "Join lookup failed");
                        send_error(state, user_id, conn_id, "Join failed").await;
                        return;
                    }
                };

            if !conversation.has_party(user_id) {
                tracing::warn!(conn_id = %conn_id, user_id, conversation_id, "Unauthorized join");
                send_error(state, user_id, conn_id, "Not a party to this conversation").await;
                return;
            }

            state.room_manager.join(conversation_id, conn_id).await;
            tracing::debug!(conn_id = %conn_id, conversation_id, "Joined room");
        }
        ClientFrame::Leave { conversation_id } => {
            state.room_manager.leave(conversation_id, conn_id).await;
            tracing::debug!(conn_id = %conn_id, conversation_id, "Left room");
        }
    }
}

/// Push an error frame to a single connection.
async fn send_error(state: &AppState, user_id: DbId, conn_id: &str, error: &str) {
    // The manager addresses by user; narrow to the offending connection by
    // including its id so multi-tab clients can ignore frames not for them.
    let frame = serde_json::json!({
        "type": "error",
        "conn_id": conn_id,
        "error": error,
    });
    let msg = Message::Text(frame.to_string().into());
    state.room_manager.send_to_user(user_id, msg).await;
}
