use std::sync::Arc;

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;
use crate::ws::RoomManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stayhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket room manager (the messaging relay's membership table).
    pub room_manager: Arc<RoomManager>,
    /// Centralized event bus for publishing domain events.
    pub event_bus: Arc<stayhub_events::EventBus>,
    /// Sliding-window rate limiter.
    pub rate_limiter: Arc<RateLimiter>,
}
