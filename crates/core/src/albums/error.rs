use thiserror::Error;

/// Validation errors for album requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlbumError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    /// `albumId` absent from an update body.
    #[error("Missing albumId")]
    MissingAlbumId,

    /// `id` absent from a delete query.
    #[error("Missing album ID")]
    MissingIdParam,

    #[error("Invalid action")]
    InvalidAction,
}

/// Maps an [`AlbumError`] to an HTTP status code.
pub fn album_error_to_status_code(error: &AlbumError) -> u16 {
    match error {
        AlbumError::MissingRequiredFields
        | AlbumError::MissingAlbumId
        | AlbumError::MissingIdParam
        | AlbumError::InvalidAction => 400,
    }
}
