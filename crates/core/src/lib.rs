//! Functional core for the AAASJ website service.
//!
//! Everything in this crate is free of I/O: record types, request
//! validation, ordering rules, the Google Photos page extraction heuristics,
//! scholarship rendering and the repository traits the server implements.

pub mod albums;
#[cfg(feature = "auth")]
pub mod auth;
pub mod events;
pub mod photos;
pub mod scholarship;
pub mod security;
pub mod serde;
pub mod storage;
