//! Reservation status constants and transition rules.
//!
//! A reservation moves through a small state machine per (listing,
//! requester) pair: it is created PENDING, the owner moves it to ACCEPTED
//! or DECLINED, and a DECLINED reservation may be revived back to PENDING
//! by a later request instead of inserting a second row.

use crate::error::CoreError;

/// Awaiting a decision from the listing owner.
pub const STATUS_PENDING: &str = "pending";

/// Owner accepted; one slot of the listing is consumed. Terminal.
pub const STATUS_ACCEPTED: &str = "accepted";

/// Owner declined; the row may be revived to PENDING by a new request.
pub const STATUS_DECLINED: &str = "declined";

/// All valid reservation status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_ACCEPTED, STATUS_DECLINED];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid reservation status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Whether a reservation in `status` can be accepted or declined by the owner.
pub fn is_pending(status: &str) -> bool {
    status == STATUS_PENDING
}

/// Whether a reservation in `status` still occupies the pair's "live" slot.
///
/// At most one reservation per (listing, requester) pair may be live at any
/// time; a DECLINED row is not live and is revived instead of duplicated.
pub fn is_live(status: &str) -> bool {
    status == STATUS_PENDING || status == STATUS_ACCEPTED
}

/// Validate a state transition.
///
/// Allowed: PENDING -> ACCEPTED, PENDING -> DECLINED, DECLINED -> PENDING
/// (revival by a new request). Everything else is a conflict; ACCEPTED is
/// terminal.
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    let allowed = matches!(
        (from, to),
        (STATUS_PENDING, STATUS_ACCEPTED)
            | (STATUS_PENDING, STATUS_DECLINED)
            | (STATUS_DECLINED, STATUS_PENDING)
    );
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot transition reservation from '{from}' to '{to}'"
        )))
    }
}
