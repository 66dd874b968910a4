use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use stayhub_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Authenticated user that owns this connection.
    pub user_id: DbId,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages all active WebSocket connections and their room subscriptions.
///
/// Rooms are keyed by conversation id and hold connection ids, not user
/// ids, so a user with several tabs open receives a broadcast once per
/// tab. The room table is ephemeral: it is rebuilt from scratch by client
/// rejoin after a process restart and is never a source of truth.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. The two locks are never held at the same
/// time.
pub struct RoomManager {
    connections: RwLock<HashMap<String, WsConnection>>,
    rooms: RwLock<HashMap<DbId, HashSet<String>>>,
}

impl RoomManager {
    /// Create a new, empty manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: DbId,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its id, leaving every room it had joined.
    pub async fn remove(&self, conn_id: &str) {
        {
            let mut rooms = self.rooms.write().await;
            for members in rooms.values_mut() {
                members.remove(conn_id);
            }
            rooms.retain(|_, members| !members.is_empty());
        }
        self.connections.write().await.remove(conn_id);
    }

    /// Subscribe a connection to a conversation's room.
    pub async fn join(&self, conversation_id: DbId, conn_id: &str) {
        self.rooms
            .write()
            .await
            .entry(conversation_id)
            .or_default()
            .insert(conn_id.to_string());
    }

    /// Unsubscribe a connection from a conversation's room.
    pub async fn leave(&self, conversation_id: DbId, conn_id: &str) {
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get_mut(&conversation_id) {
            members.remove(conn_id);
            if members.is_empty() {
                rooms.remove(&conversation_id);
            }
        }
    }

    /// Broadcast a message to every connection subscribed to a room.
    ///
    /// No sender filtering: the sender's own tabs receive the broadcast
    /// too, and the client reconciles optimistic messages. Connections
    /// whose send channels are closed are silently skipped (they will be
    /// cleaned up on their next receive loop iteration). Returns the number
    /// of connections the message was sent to.
    pub async fn publish_to_room(&self, conversation_id: DbId, message: Message) -> usize {
        let members: Vec<String> = {
            let rooms = self.rooms.read().await;
            match rooms.get(&conversation_id) {
                Some(members) => members.iter().cloned().collect(),
                None => return 0,
            }
        };

        let conns = self.connections.read().await;
        let mut count = 0;
        for conn_id in &members {
            if let Some(conn) = conns.get(conn_id) {
                let _ = conn.sender.send(message.clone());
                count += 1;
            }
        }
        count
    }

    /// Send a message to all connections belonging to a specific user.
    ///
    /// Returns the number of connections the message was sent to.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values() {
            if conn.user_id == user_id {
                let _ = conn.sender.send(message.clone());
                count += 1;
            }
        }
        count
    }

    /// Return the number of connections subscribed to a room.
    pub async fn room_size(&self, conversation_id: DbId) -> usize {
        self.rooms
            .read()
            .await
            .get(&conversation_id)
            .map_or(0, HashSet::len)
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear all state.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        self.rooms.write().await.clear();
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
