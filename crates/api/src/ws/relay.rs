//! Event-to-room rebroadcast relay.
//!
//! [`MessagingRelay`] subscribes to the event bus and fans chat events out
//! to the connections subscribed to the affected conversation's room. It
//! holds no durable state: the message and seen-flag rows are committed by
//! the HTTP handlers before the event is published, so a failed or
//! unobserved broadcast costs nothing but the live update.

use std::sync::Arc;

use axum::extract::ws::Message;
use stayhub_events::{DomainEvent, MESSAGE_SEEN, MESSAGE_SENT};
use tokio::sync::broadcast;

use crate::ws::RoomManager;

/// Rebroadcasts persisted chat events to conversation rooms.
pub struct MessagingRelay {
    room_manager: Arc<RoomManager>,
}

impl MessagingRelay {
    /// Create a new relay over the given room manager.
    pub fn new(room_manager: Arc<RoomManager>) -> Self {
        Self { room_manager }
    }

    /// Run the relay loop.
    ///
    /// Consumes events from the bus via `receiver` and exits when the
    /// channel is closed (i.e. the [`EventBus`](stayhub_events::EventBus)
    /// is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.relay_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Dropped broadcasts are acceptable: clients recover
                    // the full history on the next page load.
                    tracing::warn!(skipped = n, "Messaging relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, messaging relay shutting down");
                    break;
                }
            }
        }
    }

    /// Fan a single chat event out to its conversation room.
    ///
    /// Non-chat events are ignored; the notification router owns those.
    async fn relay_event(&self, event: &DomainEvent) {
        let frame = match event.event_type.as_str() {
            MESSAGE_SENT => serde_json::json!({
                "type": "message.new",
                "conversation_id": event.conversation_id,
                "message": event.payload,
            }),
            MESSAGE_SEEN => serde_json::json!({
                "type": "messages.seen",
                "conversation_id": event.conversation_id,
                "seen_by_user_id": event.actor_user_id,
                "seen_at": event.timestamp,
            }),
            _ => return,
        };

        let Some(conversation_id) = event.conversation_id else {
            tracing::warn!(event_type = %event.event_type, "Chat event without conversation id");
            return;
        };

        let msg = Message::Text(frame.to_string().into());
        let delivered = self
            .room_manager
            .publish_to_room(conversation_id, msg)
            .await;
        tracing::debug!(
            conversation_id,
            delivered,
            event_type = %event.event_type,
            "Relayed chat event"
        );
    }
}
