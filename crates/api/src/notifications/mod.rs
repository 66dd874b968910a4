//! Notification infrastructure.

mod router;

pub use router::NotificationRouter;
