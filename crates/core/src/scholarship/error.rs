use thiserror::Error;

use crate::security::UploadError;

#[derive(Debug, Error)]
pub enum ScholarshipError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    #[error("Failed to render application PDF: {0}")]
    Pdf(String),

    #[error("{0}")]
    Mail(String),
}

/// Maps a scholarship error to an HTTP status code.
pub fn scholarship_error_to_status_code(error: &ScholarshipError) -> u16 {
    match error {
        ScholarshipError::Upload(_) | ScholarshipError::InvalidForm(_) => 400,
        ScholarshipError::Pdf(_) | ScholarshipError::Mail(_) => 500,
    }
}
