//! Google Photos Library API client.
//!
//! Calls are made with the access token Google granted the signed-in admin.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

const LIBRARY_API: &str = "https://photoslibrary.googleapis.com/v1";
const TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Albums requested per page.
pub const PAGE_SIZE: u32 = 50;
/// Pages followed per collection before giving up.
pub const MAX_PAGES: usize = 50;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// Google answered with a non-2xx status; the body is passed through.
    #[error("Photos Library API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Photos Library request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LibraryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// The two album listings of a Photos library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumCollection {
    Owned,
    Shared,
}

impl AlbumCollection {
    /// Path segment of the listing, which is also the key of its items.
    pub fn key(self) -> &'static str {
        match self {
            Self::Owned => "albums",
            Self::Shared => "sharedAlbums",
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct AlbumPage {
    pub albums: Vec<Value>,
    pub next_page_token: Option<String>,
}

/// Response of the token introspection endpoint.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub status: u16,
    /// Parsed JSON on success, the raw text otherwise.
    pub body: Value,
}

#[async_trait]
pub trait PhotosLibraryClient: Send + Sync {
    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, LibraryError>;

    async fn list_albums(
        &self,
        access_token: &str,
        collection: AlbumCollection,
        page_token: Option<&str>,
    ) -> Result<AlbumPage, LibraryError>;

    /// Creates an album and returns Google's response body.
    async fn create_album(&self, access_token: &str, title: &str) -> Result<String, LibraryError>;
}

/// Every album of a collection, following page tokens.
///
/// Pagination stops at the first error, which is returned alongside the
/// albums collected up to that point.
pub async fn collect_albums(
    client: &dyn PhotosLibraryClient,
    access_token: &str,
    collection: AlbumCollection,
) -> (Vec<Value>, Option<LibraryError>) {
    let mut albums = Vec::new();
    let mut page_token: Option<String> = None;

    for _ in 0..MAX_PAGES {
        let page = match client
            .list_albums(access_token, collection, page_token.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => return (albums, Some(e)),
        };
        albums.extend(page.albums);
        page_token = page.next_page_token.filter(|t| !t.is_empty());
        if page_token.is_none() {
            break;
        }
    }

    (albums, None)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    albums: Vec<Value>,
    #[serde(default)]
    shared_albums: Vec<Value>,
    next_page_token: Option<String>,
}

/// [`PhotosLibraryClient`] backed by the public Google endpoints.
#[derive(Debug, Clone, Default)]
pub struct GooglePhotosLibrary {
    client: reqwest::Client,
}

impl GooglePhotosLibrary {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

async fn api_error(resp: reqwest::Response) -> LibraryError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    LibraryError::Api { status, body }
}

#[async_trait]
impl PhotosLibraryClient for GooglePhotosLibrary {
    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, LibraryError> {
        let resp = self
            .client
            .get(TOKEN_INFO_URL)
            .query(&[("access_token", access_token)])
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        let body = if status.is_success() {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };
        Ok(TokenInfo {
            status: status.as_u16(),
            body,
        })
    }

    async fn list_albums(
        &self,
        access_token: &str,
        collection: AlbumCollection,
        page_token: Option<&str>,
    ) -> Result<AlbumPage, LibraryError> {
        let mut request = self
            .client
            .get(format!("{LIBRARY_API}/{}", collection.key()))
            .bearer_auth(access_token)
            .query(&[("pageSize", PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        let list: ListResponse = resp.json().await?;
        let albums = match collection {
            AlbumCollection::Owned => list.albums,
            AlbumCollection::Shared => list.shared_albums,
        };
        Ok(AlbumPage {
            albums,
            next_page_token: list.next_page_token,
        })
    }

    async fn create_album(&self, access_token: &str, title: &str) -> Result<String, LibraryError> {
        let resp = self
            .client
            .post(format!("{LIBRARY_API}/albums"))
            .bearer_auth(access_token)
            .json(&json!({ "album": { "title": title } }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }
        Ok(resp.text().await?)
    }
}

/// In-memory library returning canned pages.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeLibrary {
    pub owned_pages: Vec<Vec<Value>>,
    pub shared_pages: Vec<Vec<Value>>,
    pub shared_error: Option<(u16, String)>,
    pub created: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
#[async_trait]
impl PhotosLibraryClient for FakeLibrary {
    async fn token_info(&self, _access_token: &str) -> Result<TokenInfo, LibraryError> {
        Ok(TokenInfo {
            status: 200,
            body: json!({ "scope": "https://www.googleapis.com/auth/photoslibrary.readonly" }),
        })
    }

    async fn list_albums(
        &self,
        _access_token: &str,
        collection: AlbumCollection,
        page_token: Option<&str>,
    ) -> Result<AlbumPage, LibraryError> {
        let pages = match collection {
            AlbumCollection::Owned => &self.owned_pages,
            AlbumCollection::Shared => {
                if let Some((status, body)) = &self.shared_error {
                    return Err(LibraryError::Api {
                        status: *status,
                        body: body.clone(),
                    });
                }
                &self.shared_pages
            }
        };
        let index: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let albums = pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Ok(AlbumPage {
            albums,
            next_page_token,
        })
    }

    async fn create_album(&self, _access_token: &str, title: &str) -> Result<String, LibraryError> {
        if let Ok(mut created) = self.created.lock() {
            created.push(title.to_string());
        }
        Ok(json!({ "id": "new-album", "title": title }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_follows_page_tokens() {
        let library = FakeLibrary {
            owned_pages: vec![
                vec![json!({ "id": "a" }), json!({ "id": "b" })],
                vec![json!({ "id": "c" })],
            ],
            ..Default::default()
        };

        let (albums, error) = collect_albums(&library, "token", AlbumCollection::Owned).await;

        assert!(error.is_none());
        assert_eq!(albums.len(), 3);
    }

    #[tokio::test]
    async fn test_collect_stops_at_first_error() {
        let library = FakeLibrary {
            shared_error: Some((403, "insufficient scopes".to_string())),
            ..Default::default()
        };

        let (albums, error) = collect_albums(&library, "token", AlbumCollection::Shared).await;

        assert!(albums.is_empty());
        assert!(matches!(error, Some(LibraryError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_collect_caps_page_count() {
        let library = FakeLibrary {
            owned_pages: (0..MAX_PAGES + 5).map(|i| vec![json!({ "id": i })]).collect(),
            ..Default::default()
        };

        let (albums, _) = collect_albums(&library, "token", AlbumCollection::Owned).await;

        assert_eq!(albums.len(), MAX_PAGES);
    }

    #[test]
    fn test_list_response_reads_either_key() {
        let owned: ListResponse =
            serde_json::from_str(r#"{"albums":[{"id":"1"}],"nextPageToken":"t"}"#).unwrap();
        assert_eq!(owned.albums.len(), 1);
        assert_eq!(owned.next_page_token.as_deref(), Some("t"));

        let shared: ListResponse = serde_json::from_str(r#"{"sharedAlbums":[{"id":"2"}]}"#).unwrap();
        assert_eq!(shared.shared_albums.len(), 1);
        assert!(shared.next_page_token.is_none());
    }
}
