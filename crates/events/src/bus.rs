//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`DomainEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.
//! Publishing happens only after the corresponding database writes have
//! committed, so subscribers never observe a state change that is not
//! durable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stayhub_core::types::DbId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// A renter requested a reservation; target is the listing owner.
pub const RESERVATION_REQUESTED: &str = "reservation.requested";

/// An owner accepted a reservation; target is the renter.
pub const RESERVATION_ACCEPTED: &str = "reservation.accepted";

/// An owner declined a reservation; target is the renter.
pub const RESERVATION_DECLINED: &str = "reservation.declined";

/// A listing passed moderation; target is the listing owner.
pub const LISTING_APPROVED: &str = "listing.approved";

/// A listing was rejected by moderation; target is the listing owner.
pub const LISTING_REJECTED: &str = "listing.rejected";

/// A chat message was persisted; the relay rebroadcasts it to the room.
pub const MESSAGE_SENT: &str = "message.sent";

/// A batch of messages was marked seen; the relay broadcasts the receipt.
pub const MESSAGE_SEEN: &str = "message.seen";

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the marketplace.
///
/// Constructed via [`DomainEvent::new`] and enriched with the builder
/// methods [`with_listing`](DomainEvent::with_listing),
/// [`with_conversation`](DomainEvent::with_conversation),
/// [`with_actor`](DomainEvent::with_actor),
/// [`with_target`](DomainEvent::with_target), and
/// [`with_payload`](DomainEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"reservation.accepted"`.
    pub event_type: String,

    /// Listing the event concerns, if any.
    pub listing_id: Option<DbId>,

    /// Conversation the event concerns (chat events only).
    pub conversation_id: Option<DbId>,

    /// Id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Id of the user the event is addressed to (notification target).
    pub target_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// Create a new event with only the required `event_type`.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            listing_id: None,
            conversation_id: None,
            actor_user_id: None,
            target_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the listing the event concerns.
    pub fn with_listing(mut self, listing_id: DbId) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    /// Attach the conversation the event concerns.
    pub fn with_conversation(mut self, conversation_id: DbId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach the user the event is addressed to.
    pub fn with_target(mut self, user_id: DbId) -> Self {
        self.target_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DomainEvent`].
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// durability never depends on delivery.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
