pub mod albums;
mod error;
pub mod events;
pub mod google_photos;
pub mod health;
pub mod photos_debug;
pub mod scholarship;

pub use error::{parse_json, AppError, RequestError};
