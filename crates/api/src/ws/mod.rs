//! WebSocket infrastructure for real-time messaging.
//!
//! Provides the room-based connection manager, heartbeat monitoring, the
//! HTTP upgrade handler used by Axum routes, and the relay task that
//! rebroadcasts persisted chat events to room subscribers.

mod handler;
mod heartbeat;
pub mod manager;
mod relay;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::RoomManager;
pub use relay::MessagingRelay;
