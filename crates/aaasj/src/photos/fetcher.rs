//! Shared album page fetching.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use aaasj_core::albums::Photo;
use aaasj_core::photos::{
    classify_share_url, embed_url, extract_photos, PageSource, ScrapeError, ShareLinkKind,
    BROWSER_USER_AGENT,
};

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// An album page and where it came from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub source: PageSource,
    /// Album URL after following a short link's redirects.
    pub actual_url: String,
    /// Embed variant of a short link, if one was derived.
    pub embed_url: Option<String>,
}

/// Fetches the HTML of a shared album page.
#[async_trait]
pub trait AlbumPageFetcher: Send + Sync {
    async fn fetch_album_page(&self, share_url: &str) -> Result<FetchedPage, ScrapeError>;
}

/// [`AlbumPageFetcher`] that talks to Google with a desktop browser identity.
#[derive(Debug, Clone)]
pub struct HttpAlbumFetcher {
    client: reqwest::Client,
}

impl HttpAlbumFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Body of a 2xx response, `None` for anything else.
    async fn try_page(&self, url: &str) -> Option<String> {
        match self.client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => resp.text().await.ok(),
            Ok(resp) => {
                tracing::debug!(url, status = %resp.status(), "Embed page not available");
                None
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "Embed page request failed");
                None
            }
        }
    }
}

#[async_trait]
impl AlbumPageFetcher for HttpAlbumFetcher {
    async fn fetch_album_page(&self, share_url: &str) -> Result<FetchedPage, ScrapeError> {
        let (actual_url, embed) = match classify_share_url(share_url) {
            ShareLinkKind::ShortLink => {
                let resp = self.client.get(share_url).send().await.map_err(|e| {
                    ScrapeError::Fetch {
                        url: share_url.to_string(),
                        message: e.to_string(),
                    }
                })?;
                let actual = resp.url().to_string();
                tracing::debug!(share_url, actual_url = %actual, "Short link resolved");
                (actual, Some(embed_url(share_url)))
            }
            ShareLinkKind::Direct | ShareLinkKind::Other => (share_url.to_string(), None),
        };

        if let Some(embed) = &embed {
            if let Some(html) = self.try_page(embed).await {
                tracing::debug!(url = %embed, html_length = html.len(), "Using embed page");
                return Ok(FetchedPage {
                    html,
                    source: PageSource::Embed,
                    actual_url,
                    embed_url: Some(embed.clone()),
                });
            }
        }

        let resp = self
            .client
            .get(&actual_url)
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch {
                url: actual_url.clone(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(ScrapeError::Status {
                url: actual_url,
                status: resp.status().as_u16(),
            });
        }

        let html = resp.text().await.map_err(|e| ScrapeError::Fetch {
            url: actual_url.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(url = %actual_url, html_length = html.len(), "Using album page");

        Ok(FetchedPage {
            html,
            source: PageSource::Actual,
            actual_url,
            embed_url: embed,
        })
    }
}

/// Scrapes the photos of a shared album.
///
/// A page that cannot be fetched yields no photos; albums are refreshed by
/// hand, so the failure is only logged.
pub async fn scrape_album(fetcher: &dyn AlbumPageFetcher, share_url: &str) -> Vec<Photo> {
    let page = match fetcher.fetch_album_page(share_url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(share_url, url = ?e.url(), error = %e, "Failed to fetch album page");
            return Vec::new();
        }
    };

    let report = extract_photos(&page.html, share_url, Utc::now().timestamp_millis());

    tracing::info!(
        share_url,
        source = ?page.source,
        photos = report.photos.len(),
        reported_total = ?report.reported_total,
        from_img_tags = report.from_img_tags,
        from_script_json = report.from_script_json,
        from_sized_urls = report.from_sized_urls,
        "Album scraped"
    );
    if report.is_partial() {
        tracing::info!(
            share_url,
            "Album page lists fewer photos than it announces; Google loads the rest lazily"
        );
    }

    report.photos
}

/// Serves fixed pages keyed by share URL.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct StaticPageFetcher {
    pages: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl StaticPageFetcher {
    pub fn with_page(mut self, share_url: &str, html: &str) -> Self {
        self.pages.insert(share_url.to_string(), html.to_string());
        self
    }
}

#[cfg(test)]
#[async_trait]
impl AlbumPageFetcher for StaticPageFetcher {
    async fn fetch_album_page(&self, share_url: &str) -> Result<FetchedPage, ScrapeError> {
        let html = self.pages.get(share_url).ok_or_else(|| ScrapeError::Status {
            url: share_url.to_string(),
            status: 404,
        })?;
        Ok(FetchedPage {
            html: html.clone(),
            source: PageSource::Actual,
            actual_url: share_url.to_string(),
            embed_url: None,
        })
    }
}
