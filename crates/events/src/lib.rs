//! Stayhub in-process event bus.
//!
//! - [`EventBus`] — publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical domain event envelope.
//!
//! Reservation transitions and chat activity are published here after the
//! corresponding rows are durably committed; the notification router and
//! the messaging relay consume them independently.

pub mod bus;

pub use bus::{DomainEvent, EventBus};
pub use bus::{
    LISTING_APPROVED, LISTING_REJECTED, MESSAGE_SEEN, MESSAGE_SENT, RESERVATION_ACCEPTED,
    RESERVATION_DECLINED, RESERVATION_REQUESTED,
};
