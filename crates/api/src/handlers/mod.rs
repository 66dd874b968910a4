//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate input, check that the caller is a party to the
//! resource, and delegate to the engine or the corresponding repository in
//! `stayhub_db`, mapping errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod conversation;
pub mod listing;
pub mod message;
pub mod notification;
pub mod report;
pub mod reservation;
pub mod review;
