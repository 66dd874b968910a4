//! User role constants.

use crate::error::CoreError;

/// Regular marketplace user (renter and/or listing owner).
pub const ROLE_USER: &str = "user";

/// Administrator; may moderate listings.
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

/// Validate that a role name is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_accepted() {
        assert!(validate_role(ROLE_USER).is_ok());
        assert!(validate_role(ROLE_ADMIN).is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(validate_role("moderator").is_err());
    }
}
