//! Google Photos integration helpers.
//!
//! Shared albums have no public API, so photos are pulled out of the album
//! web page with a handful of regular-expression passes. Google changes that
//! markup without notice; everything here is best effort and an empty result
//! is a normal outcome.

mod diagnose;
mod error;
mod library;
mod scrape;
mod share;

pub use diagnose::{diagnose_page, PageDiagnostics, PatternMatches};
pub use error::{scrape_error_to_status_code, ScrapeError};
pub use library::merge_library_albums;
pub use scrape::{
    canonical_base_url, extract_photos, ScrapeReport, CDN_PREFIX, SIZED_URL_PASS_LIMIT,
    THUMBNAIL_SIZE, VIEWER_SIZE,
};
pub use share::{classify_share_url, embed_url, PageSource, ShareLinkKind, BROWSER_USER_AGENT};
