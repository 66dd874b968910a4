//! Stayhub domain core.
//!
//! Pure domain logic shared by the database and API layers: the error
//! taxonomy, status constants and transition rules for listings and
//! reservations, validation helpers, the rate-limit policy table, and the
//! review-eligibility predicate. This crate performs no I/O.

pub mod error;
pub mod listing;
pub mod message;
pub mod notification;
pub mod rate_limit;
pub mod reservation;
pub mod review;
pub mod roles;
pub mod types;
