//! Listing moderation status constants and availability rules.
//!
//! The moderation lifecycle (PENDING -> APPROVED / REJECTED) is independent
//! of reservations: only APPROVED listings accept reservation requests.

use crate::error::CoreError;

/// Listing is awaiting moderation and not yet visible for reservations.
pub const STATUS_PENDING: &str = "pending";

/// Listing passed moderation and accepts reservation requests.
pub const STATUS_APPROVED: &str = "approved";

/// Listing was rejected by moderation.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid listing status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Moderation decisions an admin may apply to a pending listing.
pub const VALID_DECISIONS: &[&str] = &[STATUS_APPROVED, STATUS_REJECTED];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid listing status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate that a moderation decision is one of the accepted values.
pub fn validate_decision(decision: &str) -> Result<(), CoreError> {
    if VALID_DECISIONS.contains(&decision) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid moderation decision '{decision}'. Must be one of: {}",
            VALID_DECISIONS.join(", ")
        )))
    }
}

/// Derive the availability flag from a slot count.
///
/// `slots_available` is authoritative; `is_available` is a cached flag that
/// must be updated in the same transaction as every slot change.
pub fn derive_is_available(slots_available: i32) -> bool {
    slots_available > 0
}
