//! Storage backend implementations.
//!
//! Events and albums are small, admin-edited lists, so each lives in its own
//! JSON file under the data directory.

mod json_file;

pub use json_file::JsonFileStore;
