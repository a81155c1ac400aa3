use serde::Deserialize;

use crate::serde::{deserialize_optional_string, deserialize_truthy};

use super::{AlbumError, SharedAlbum};

/// Body of `POST /api/photos/albums`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub share_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub is_public: bool,
    /// Scrape the album right away instead of waiting for a refresh.
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub fetch_photos: bool,
}

impl CreateAlbumRequest {
    /// Validates the request and builds an album without photos.
    pub fn into_album(self, id: impl Into<String>) -> Result<SharedAlbum, AlbumError> {
        let (Some(title), Some(share_url)) = (self.title, self.share_url) else {
            return Err(AlbumError::MissingRequiredFields);
        };

        Ok(SharedAlbum {
            id: id.into(),
            title: title.trim().to_string(),
            share_url: share_url.trim().to_string(),
            description: self.description.map(|d| d.trim().to_string()),
            is_public: self.is_public,
            photos: Vec::new(),
        })
    }
}

/// What an album update should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumAction {
    /// Drop the stored photos and scrape the album again.
    FetchPhotos,
    /// Remove one photo by ID.
    RemovePhoto(String),
}

/// Body of `PUT /api/photos/albums`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub album_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub photo_id: Option<String>,
}

impl UpdateAlbumRequest {
    pub fn album_id(&self) -> Result<&str, AlbumError> {
        self.album_id.as_deref().ok_or(AlbumError::MissingAlbumId)
    }

    /// Resolves the requested action. `removePhoto` needs a `photoId`.
    pub fn action(&self) -> Result<AlbumAction, AlbumError> {
        match (self.action.as_deref(), &self.photo_id) {
            (Some("fetchPhotos"), _) => Ok(AlbumAction::FetchPhotos),
            (Some("removePhoto"), Some(photo_id)) => Ok(AlbumAction::RemovePhoto(photo_id.clone())),
            _ => Err(AlbumError::InvalidAction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_and_requires_title_and_share_url() {
        let request: CreateAlbumRequest = serde_json::from_str(
            r#"{"title": "  Gala 2025 ", "shareUrl": " https://photos.app.goo.gl/abc ",
                "description": "", "isPublic": "true"}"#,
        )
        .unwrap();

        let album = request.into_album("1700000000000").unwrap();

        assert_eq!(album.title, "Gala 2025");
        assert_eq!(album.share_url, "https://photos.app.goo.gl/abc");
        assert_eq!(album.description, None);
        assert!(album.is_public);
        assert!(album.photos.is_empty());
    }

    #[test]
    fn create_rejects_blank_share_url() {
        let request: CreateAlbumRequest =
            serde_json::from_str(r#"{"title": "Gala", "shareUrl": "   "}"#).unwrap();

        assert_eq!(
            request.into_album("1").unwrap_err(),
            AlbumError::MissingRequiredFields
        );
    }

    #[test]
    fn fetch_photos_defaults_to_false() {
        let request: CreateAlbumRequest =
            serde_json::from_str(r#"{"title": "Gala", "shareUrl": "u"}"#).unwrap();
        assert!(!request.fetch_photos);
    }

    #[test]
    fn update_actions() {
        let parse = |json: &str| serde_json::from_str::<UpdateAlbumRequest>(json).unwrap();

        assert_eq!(
            parse(r#"{"albumId": "1", "action": "fetchPhotos"}"#).action(),
            Ok(AlbumAction::FetchPhotos)
        );
        assert_eq!(
            parse(r#"{"albumId": "1", "action": "removePhoto", "photoId": "p1"}"#).action(),
            Ok(AlbumAction::RemovePhoto("p1".to_string()))
        );
        assert_eq!(
            parse(r#"{"albumId": "1", "action": "removePhoto"}"#).action(),
            Err(AlbumError::InvalidAction)
        );
        assert_eq!(
            parse(r#"{"albumId": "1", "action": "rename"}"#).action(),
            Err(AlbumError::InvalidAction)
        );
        assert_eq!(parse("{}").album_id(), Err(AlbumError::MissingAlbumId));
    }
}
