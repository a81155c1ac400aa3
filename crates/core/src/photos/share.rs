use serde::Serialize;

/// User agent sent when fetching album pages; Google serves a stripped page
/// to unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Kind of album link an admin pasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareLinkKind {
    /// `photos.app.goo.gl` short link that redirects to the album.
    ShortLink,
    /// A `photos.google.com` album URL.
    Direct,
    Other,
}

/// Which page the scraped HTML came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    Embed,
    Actual,
}

pub fn classify_share_url(share_url: &str) -> ShareLinkKind {
    if share_url.contains("photos.app.goo.gl") {
        ShareLinkKind::ShortLink
    } else if share_url.contains("photos.google.com") {
        ShareLinkKind::Direct
    } else {
        ShareLinkKind::Other
    }
}

/// Embeddable variant of a share link.
pub fn embed_url(share_url: &str) -> String {
    share_url.replace("/share/", "/embed/")
}
