//! Domain operation orchestration.
//!
//! The engine modules sit between the HTTP handlers and the repositories:
//! they enforce rate limits and preconditions, run the repository
//! transactions, and publish domain events after commit. Handlers stay
//! thin adapters over these functions.

pub mod reservations;
