//! Chat message validation.

use crate::error::CoreError;

/// Maximum length for a chat message body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Validate a chat message body.
///
/// The body must be non-empty after trimming and within the length cap.
pub fn validate_message_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Message body must not be empty".into()));
    }
    if body.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message body exceeds the maximum length of {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_body_passes() {
        assert!(validate_message_body("Is the apartment still available?").is_ok());
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(validate_message_body("").is_err());
        assert!(validate_message_body("   \n\t ").is_err());
    }

    #[test]
    fn test_body_at_cap_passes() {
        let body = "a".repeat(MAX_MESSAGE_LENGTH);
        assert!(validate_message_body(&body).is_ok());
    }

    #[test]
    fn test_body_over_cap_rejected() {
        let body = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let result = validate_message_body(&body);
        assert!(result.is_err());
    }
}
