//! Notification kind constants.
//!
//! Consumed by the db and api layers when creating and filtering
//! notification rows.

use crate::error::CoreError;

/// Notification about a reservation transition (requested, accepted, declined).
pub const KIND_RESERVATION: &str = "reservation";

/// Notification about a listing moderation decision.
pub const KIND_LISTING: &str = "listing";

/// All valid notification kinds.
pub const VALID_KINDS: &[&str] = &[KIND_RESERVATION, KIND_LISTING];

/// Validate that a notification kind is one of the accepted values.
pub fn validate_kind(kind: &str) -> Result<(), CoreError> {
    if VALID_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid notification kind '{kind}'. Must be one of: {}",
            VALID_KINDS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_accepted() {
        assert!(validate_kind(KIND_RESERVATION).is_ok());
        assert!(validate_kind(KIND_LISTING).is_ok());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(validate_kind("marketing").is_err());
    }
}
