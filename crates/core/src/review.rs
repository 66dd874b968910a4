//! Review validation and eligibility rules.
//!
//! A renter becomes eligible to review the address of a listing once at
//! least [`REVIEW_ELIGIBILITY_DAYS`] days have elapsed since their
//! reservation was accepted. Eligibility is a computed predicate, never
//! stored state.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum allowed rating.
pub const MIN_RATING: i32 = 1;

/// Maximum allowed rating.
pub const MAX_RATING: i32 = 5;

/// Maximum length for a review comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Days that must elapse after acceptance before a review can be submitted.
pub const REVIEW_ELIGIBILITY_DAYS: i64 = 30;

/// Validate that a rating is within `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )))
    }
}

/// Validate an optional review comment against the length cap.
pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds the maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Whether enough time has elapsed since acceptance to allow a review.
pub fn is_review_eligible(accepted_at: Timestamp, now: Timestamp) -> bool {
    now - accepted_at >= chrono::Duration::days(REVIEW_ELIGIBILITY_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_ratings_in_range_pass() {
        for rating in MIN_RATING..=MAX_RATING {
            assert!(validate_rating(rating).is_ok());
        }
    }

    #[test]
    fn test_ratings_out_of_range_rejected() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn test_comment_over_cap_rejected() {
        let comment = "x".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(validate_comment(&comment).is_err());
        assert!(validate_comment("great place").is_ok());
    }

    #[test]
    fn test_not_eligible_before_thirty_days() {
        let now = Utc::now();
        let accepted_at = now - Duration::days(REVIEW_ELIGIBILITY_DAYS - 1);
        assert!(!is_review_eligible(accepted_at, now));
    }

    #[test]
    fn test_eligible_at_exactly_thirty_days() {
        let now = Utc::now();
        let accepted_at = now - Duration::days(REVIEW_ELIGIBILITY_DAYS);
        assert!(is_review_eligible(accepted_at, now));
    }

    #[test]
    fn test_eligible_after_thirty_days() {
        let now = Utc::now();
        let accepted_at = now - Duration::days(REVIEW_ELIGIBILITY_DAYS + 90);
        assert!(is_review_eligible(accepted_at, now));
    }
}
