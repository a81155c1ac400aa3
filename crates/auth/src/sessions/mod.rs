//! Session storage.
//!
//! The CMS has a handful of users, so sessions live in process memory and a
//! restart signs everybody out.

mod inmemory;

pub use inmemory::SessionStore;
