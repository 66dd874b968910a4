//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes that entity supports

pub mod conversation;
pub mod listing;
pub mod message;
pub mod notification;
pub mod report;
pub mod reservation;
pub mod review;
pub mod user;
