//! Shared Google Photos albums curated through the admin screens.

mod error;
mod requests;
mod types;

pub use error::{album_error_to_status_code, AlbumError};
pub use requests::{AlbumAction, CreateAlbumRequest, UpdateAlbumRequest};
pub use types::{visible_albums, Photo, SharedAlbum, DEFAULT_PHOTO_HEIGHT, DEFAULT_PHOTO_WIDTH};
