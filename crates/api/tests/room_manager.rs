//! Unit tests for `RoomManager`.
//!
//! These tests exercise the room-based connection manager directly, without
//! performing any HTTP upgrades. They verify add/remove semantics,
//! room-scoped broadcast delivery, multi-tab fan-out, and graceful
//! shutdown behaviour.

use assert_matches::assert_matches;
use axum::extract::ws::Message;
use stayhub_api::ws::RoomManager;

// ---------------------------------------------------------------------------
// Test: new manager starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = RoomManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: add() and remove() maintain the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_and_remove_maintain_count() {
    let manager = RoomManager::new();

    let _rx = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);

    // Removing an unknown id is a no-op.
    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: room broadcast reaches members only
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_to_room_reaches_members_only() {
    let manager = RoomManager::new();

    let mut rx_member = manager.add("member".to_string(), 1).await;
    let mut rx_other = manager.add("other".to_string(), 2).await;

    manager.join(7, "member").await;
    manager.join(99, "other").await;

    let delivered = manager
        .publish_to_room(7, Message::Text("room seven".into()))
        .await;
    assert_eq!(delivered, 1);

    let msg = rx_member.recv().await.expect("member should receive");
    assert!(matches!(&msg, Message::Text(t) if *t == "room seven"));

    // The non-member's channel stays empty.
    assert!(rx_other.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: the sender's other tabs receive room broadcasts too
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multi_tab_user_receives_once_per_connection() {
    let manager = RoomManager::new();

    // Same user, two tabs, both joined to the room.
    let mut rx_tab1 = manager.add("tab-1".to_string(), 1).await;
    let mut rx_tab2 = manager.add("tab-2".to_string(), 1).await;

    manager.join(7, "tab-1").await;
    manager.join(7, "tab-2").await;

    let delivered = manager
        .publish_to_room(7, Message::Text("no sender filtering".into()))
        .await;
    assert_eq!(delivered, 2);

    assert!(rx_tab1.recv().await.is_some());
    assert!(rx_tab2.recv().await.is_some());
}

// ---------------------------------------------------------------------------
// Test: leave() stops delivery; empty rooms are dropped
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leave_stops_delivery() {
    let manager = RoomManager::new();

    let mut rx = manager.add("conn-1".to_string(), 1).await;
    manager.join(7, "conn-1").await;
    assert_eq!(manager.room_size(7).await, 1);

    manager.leave(7, "conn-1").await;
    assert_eq!(manager.room_size(7).await, 0);

    let delivered = manager
        .publish_to_room(7, Message::Text("anyone?".into()))
        .await;
    assert_eq!(delivered, 0);
    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: remove() purges room memberships (implicit leave on disconnect)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_purges_room_memberships() {
    let manager = RoomManager::new();

    let _rx1 = manager.add("conn-1".to_string(), 1).await;
    let _rx2 = manager.add("conn-2".to_string(), 2).await;
    manager.join(7, "conn-1").await;
    manager.join(7, "conn-2").await;
    assert_eq!(manager.room_size(7).await, 2);

    manager.remove("conn-1").await;
    assert_eq!(manager.room_size(7).await, 1);
    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: send_to_user() targets all of a user's connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_user_reaches_all_their_connections() {
    let manager = RoomManager::new();

    let mut rx_a1 = manager.add("a-1".to_string(), 1).await;
    let mut rx_a2 = manager.add("a-2".to_string(), 1).await;
    let mut rx_b = manager.add("b-1".to_string(), 2).await;

    let sent = manager
        .send_to_user(1, Message::Text("for user one".into()))
        .await;
    assert_eq!(sent, 2);

    assert!(rx_a1.recv().await.is_some());
    assert!(rx_a2.recv().await.is_some());
    assert!(rx_b.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: broadcast skips closed channels without panicking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_skips_closed_channels() {
    let manager = RoomManager::new();

    let rx1 = manager.add("conn-1".to_string(), 1).await;
    let mut rx2 = manager.add("conn-2".to_string(), 2).await;
    manager.join(7, "conn-1").await;
    manager.join(7, "conn-2").await;

    // Drop rx1 to close its channel.
    drop(rx1);

    manager
        .publish_to_room(7, Message::Text("still alive".into()))
        .await;

    let msg = rx2.recv().await.expect("conn-2 should receive");
    assert!(matches!(&msg, Message::Text(t) if *t == "still alive"));
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close and clears connections and rooms
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = RoomManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), 1).await;
    let mut rx2 = manager.add("conn-2".to_string(), 2).await;
    manager.join(7, "conn-1").await;
    manager.join(7, "conn-2").await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert_eq!(manager.room_size(7).await, 0);

    let msg1 = rx1.recv().await.expect("rx1 should receive Close");
    assert_matches!(msg1, Message::Close(None));
    let msg2 = rx2.recv().await.expect("rx2 should receive Close");
    assert_matches!(msg2, Message::Close(None));

    // After Close, the channels are closed for good.
    assert!(rx1.recv().await.is_none());
}

// ---------------------------------------------------------------------------
// Test: adding with a duplicate id replaces the previous connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_id_replaces_previous_connection() {
    let manager = RoomManager::new();

    let _rx_old = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    // Re-add with the same id -- should replace, not duplicate.
    let mut rx_new = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    manager
        .send_to_user(1, Message::Text("replaced".into()))
        .await;
    let msg = rx_new.recv().await.expect("new rx should receive");
    assert!(matches!(&msg, Message::Text(t) if *t == "replaced"));
}
