//! Sliding-window rate-limit policy table.
//!
//! Each throttled action is identified by a dotted action name; the policy
//! table maps it to a maximum number of requests inside a trailing time
//! window. The enforcement mechanism lives in the api crate; this module
//! only defines the policies so they are shared and testable.

/// Sending a chat message.
pub const ACTION_MESSAGE_SEND: &str = "message.send";

/// Submitting a review.
pub const ACTION_REVIEW_SUBMIT: &str = "review.submit";

/// Requesting a reservation.
pub const ACTION_RESERVATION_REQUEST: &str = "reservation.request";

/// Toggling a listing's availability flag.
pub const ACTION_AVAILABILITY_TOGGLE: &str = "availability.toggle";

/// Reporting a listing.
pub const ACTION_REPORT_SUBMIT: &str = "report.submit";

/// A sliding-window limit: at most `max_requests` within `window_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Look up the policy for an action name.
///
/// Returns `None` for unthrottled actions.
pub fn policy(action: &str) -> Option<RateLimitPolicy> {
    match action {
        ACTION_MESSAGE_SEND => Some(RateLimitPolicy {
            max_requests: 5,
            window_secs: 10,
        }),
        ACTION_REVIEW_SUBMIT => Some(RateLimitPolicy {
            max_requests: 1,
            window_secs: 60,
        }),
        ACTION_RESERVATION_REQUEST => Some(RateLimitPolicy {
            max_requests: 10,
            window_secs: 3_600,
        }),
        ACTION_AVAILABILITY_TOGGLE => Some(RateLimitPolicy {
            max_requests: 10,
            window_secs: 600,
        }),
        ACTION_REPORT_SUBMIT => Some(RateLimitPolicy {
            max_requests: 5,
            window_secs: 86_400,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_throttled_actions_have_policies() {
        for action in [
            ACTION_MESSAGE_SEND,
            ACTION_REVIEW_SUBMIT,
            ACTION_RESERVATION_REQUEST,
            ACTION_AVAILABILITY_TOGGLE,
            ACTION_REPORT_SUBMIT,
        ] {
            assert!(policy(action).is_some(), "missing policy for {action}");
        }
    }

    #[test]
    fn test_message_send_policy() {
        let p = policy(ACTION_MESSAGE_SEND).unwrap();
        assert_eq!(p.max_requests, 5);
        assert_eq!(p.window_secs, 10);
    }

    #[test]
    fn test_reservation_request_policy_is_unified() {
        // One policy for reservation requests across all entry points.
        let p = policy(ACTION_RESERVATION_REQUEST).unwrap();
        assert_eq!(p.max_requests, 10);
        assert_eq!(p.window_secs, 3_600);
    }

    #[test]
    fn test_unknown_action_is_unthrottled() {
        assert!(policy("listing.view").is_none());
    }
}
