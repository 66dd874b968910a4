//! Unit tests for the sliding-window rate limiter.
//!
//! All tests run with the tokio clock paused so window expiry is
//! deterministic.

use std::time::Duration;

use stayhub_api::rate_limit::RateLimiter;
use stayhub_core::rate_limit::{
    ACTION_MESSAGE_SEND, ACTION_RESERVATION_REQUEST, ACTION_REVIEW_SUBMIT,
};

// ---------------------------------------------------------------------------
// Test: the message policy admits 5 then refuses the 6th
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn message_send_admits_five_per_window() {
    let limiter = RateLimiter::new();

    for i in 0..5 {
        assert!(
            limiter.check(1, ACTION_MESSAGE_SEND).await,
            "attempt {i} should be allowed"
        );
    }
    assert!(
        !limiter.check(1, ACTION_MESSAGE_SEND).await,
        "sixth attempt inside the window must be refused"
    );
}

// ---------------------------------------------------------------------------
// Test: the window slides -- old attempts expire
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn window_expiry_readmits_attempts() {
    let limiter = RateLimiter::new();

    for _ in 0..5 {
        assert!(limiter.check(1, ACTION_MESSAGE_SEND).await);
    }
    assert!(!limiter.check(1, ACTION_MESSAGE_SEND).await);

    // 10 seconds later the whole window has expired.
    tokio::time::advance(Duration::from_secs(10)).await;
    assert!(limiter.check(1, ACTION_MESSAGE_SEND).await);
}

// ---------------------------------------------------------------------------
// Test: a refused attempt is not recorded
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn refused_attempts_do_not_extend_the_window() {
    let limiter = RateLimiter::new();

    assert!(limiter.check(1, ACTION_REVIEW_SUBMIT).await);

    // Hammering while throttled must not push the window forward.
    for _ in 0..20 {
        assert!(!limiter.check(1, ACTION_REVIEW_SUBMIT).await);
    }

    tokio::time::advance(Duration::from_secs(60)).await;
    assert!(
        limiter.check(1, ACTION_REVIEW_SUBMIT).await,
        "window must be measured from the admitted attempt only"
    );
}

// ---------------------------------------------------------------------------
// Test: users and actions are throttled independently
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn users_and_actions_are_independent() {
    let limiter = RateLimiter::new();

    for _ in 0..5 {
        assert!(limiter.check(1, ACTION_MESSAGE_SEND).await);
    }
    assert!(!limiter.check(1, ACTION_MESSAGE_SEND).await);

    // A different user is unaffected.
    assert!(limiter.check(2, ACTION_MESSAGE_SEND).await);

    // The same user under a different action is unaffected.
    assert!(limiter.check(1, ACTION_RESERVATION_REQUEST).await);
}

// ---------------------------------------------------------------------------
// Test: unthrottled actions are always allowed
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn unknown_actions_are_unthrottled() {
    let limiter = RateLimiter::new();

    for _ in 0..100 {
        assert!(limiter.check(1, "listing.view").await);
    }
    assert_eq!(limiter.tracked_windows().await, 0);
}

// ---------------------------------------------------------------------------
// Test: purge_stale drops fully-expired windows
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn purge_drops_expired_windows() {
    let limiter = RateLimiter::new();

    limiter.check(1, ACTION_MESSAGE_SEND).await;
    limiter.check(2, ACTION_REVIEW_SUBMIT).await;
    assert_eq!(limiter.tracked_windows().await, 2);

    // The 10s message window expires; the 60s review window has not.
    tokio::time::advance(Duration::from_secs(30)).await;
    limiter.purge_stale().await;
    assert_eq!(limiter.tracked_windows().await, 1);

    tokio::time::advance(Duration::from_secs(60)).await;
    limiter.purge_stale().await;
    assert_eq!(limiter.tracked_windows().await, 0);
}
