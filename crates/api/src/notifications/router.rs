//! Event-to-notification routing.
//!
//! [`NotificationRouter`] subscribes to the event bus and turns
//! reservation and moderation events into persisted notification rows plus
//! a best-effort WebSocket push to the target user's connections. Chat
//! events are left to the [`MessagingRelay`](crate::ws::MessagingRelay).

use std::sync::Arc;

use axum::extract::ws::Message;
use stayhub_core::notification::{KIND_LISTING, KIND_RESERVATION};
use stayhub_db::repositories::NotificationRepo;
use stayhub_db::DbPool;
use stayhub_events::{
    DomainEvent, LISTING_APPROVED, LISTING_REJECTED, RESERVATION_ACCEPTED,
    RESERVATION_DECLINED, RESERVATION_REQUESTED,
};
use tokio::sync::broadcast;

use crate::ws::RoomManager;

/// Routes domain events to user notifications.
pub struct NotificationRouter {
    pool: DbPool,
    room_manager: Arc<RoomManager>,
}

impl NotificationRouter {
    /// Create a new router with the given database pool and room manager.
    pub fn new(pool: DbPool, room_manager: Arc<RoomManager>) -> Self {
        Self { pool, room_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](stayhub_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Route a single event: persist a notification row, then push it.
    async fn route_event(&self, event: &DomainEvent) -> Result<(), sqlx::Error> {
        let Some((kind, body)) = compose(event) else {
            return Ok(());
        };
        let Some(target_user_id) = event.target_user_id else {
            tracing::warn!(event_type = %event.event_type, "Notifiable event without target");
            return Ok(());
        };

        NotificationRepo::create(&self.pool, target_user_id, kind, &body, event.listing_id)
            .await?;

        // Push after the row is committed; a missed push is recovered on
        // the next notification fetch.
        let frame = serde_json::json!({
            "type": "notification",
            "kind": kind,
            "body": body,
            "listing_id": event.listing_id,
            "timestamp": event.timestamp,
        });
        let msg = Message::Text(frame.to_string().into());
        let delivered = self.room_manager.send_to_user(target_user_id, msg).await;
        tracing::debug!(
            target_user_id,
            delivered,
            event_type = %event.event_type,
            "Routed notification"
        );

        Ok(())
    }
}

/// Compose the notification kind and body for an event.
///
/// Returns `None` for event types that do not produce notifications.
fn compose(event: &DomainEvent) -> Option<(&'static str, String)> {
    let title = event
        .payload
        .get("listing_title")
        .and_then(|v| v.as_str())
        .unwrap_or("your listing");

    match event.event_type.as_str() {
        RESERVATION_REQUESTED => Some((
            KIND_RESERVATION,
            format!("New reservation request for {title}"),
        )),
        RESERVATION_ACCEPTED => Some((
            KIND_RESERVATION,
            format!("Your reservation for {title} was accepted"),
        )),
        RESERVATION_DECLINED => Some((
            KIND_RESERVATION,
            format!("Your reservation for {title} was declined"),
        )),
        LISTING_APPROVED => Some((KIND_LISTING, format!("{title} was approved"))),
        LISTING_REJECTED => Some((KIND_LISTING, format!("{title} was rejected"))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reservation_events_compose_reservation_kind() {
        let event = DomainEvent::new(RESERVATION_REQUESTED)
            .with_payload(json!({"listing_title": "Sunny Loft"}));
        let (kind, body) = compose(&event).expect("should compose");
        assert_eq!(kind, KIND_RESERVATION);
        assert!(body.contains("Sunny Loft"));
    }

    #[test]
    fn test_moderation_events_compose_listing_kind() {
        let event =
            DomainEvent::new(LISTING_APPROVED).with_payload(json!({"listing_title": "Cabin"}));
        let (kind, body) = compose(&event).expect("should compose");
        assert_eq!(kind, KIND_LISTING);
        assert!(body.contains("approved"));
    }

    #[test]
    fn test_chat_events_do_not_compose() {
        let event = DomainEvent::new(stayhub_events::MESSAGE_SENT);
        assert!(compose(&event).is_none());
    }

    #[test]
    fn test_missing_title_falls_back() {
        let event = DomainEvent::new(RESERVATION_ACCEPTED);
        let (_, body) = compose(&event).expect("should compose");
        assert!(body.contains("your listing"));
    }
}
