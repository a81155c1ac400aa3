use thiserror::Error;

/// Errors raised while fetching an album page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Missing shareUrl")]
    MissingShareUrl,

    #[error("Failed to fetch any URL: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to fetch actual URL: HTTP {status}")]
    Status { url: String, status: u16 },
}

impl ScrapeError {
    /// URL the failed request was sent to.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::MissingShareUrl => None,
            Self::Fetch { url, .. } | Self::Status { url, .. } => Some(url),
        }
    }
}

/// Maps a scrape error to an HTTP status code.
pub fn scrape_error_to_status_code(error: &ScrapeError) -> u16 {
    match error {
        ScrapeError::MissingShareUrl => 400,
        ScrapeError::Fetch { .. } | ScrapeError::Status { .. } => 500,
    }
}
