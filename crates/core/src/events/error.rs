use thiserror::Error;

/// Validation errors for event requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Missing required fields: title, date")]
    MissingRequiredFields,

    #[error("Missing id")]
    MissingId,
}

/// Maps an [`EventError`] to an HTTP status code.
pub fn event_error_to_status_code(error: &EventError) -> u16 {
    match error {
        EventError::MissingRequiredFields | EventError::MissingId => 400,
    }
}
