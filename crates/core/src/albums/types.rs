use serde::{Deserialize, Serialize};

/// Display size assumed when the album page does not report one.
pub const DEFAULT_PHOTO_WIDTH: u32 = 800;
pub const DEFAULT_PHOTO_HEIGHT: u32 = 600;

/// A photo scraped from a shared album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Viewer-sized CDN URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Share URL of the album the photo was scraped from.
    pub album_id: String,
}

/// A shared Google Photos album linked from the photos page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedAlbum {
    pub id: String,
    pub title: String,
    pub share_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl SharedAlbum {
    /// Removes the photo with the given ID. Returns whether one was removed.
    pub fn remove_photo(&mut self, photo_id: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != photo_id);
        self.photos.len() != before
    }
}

/// Albums a caller may see: members of the organization see everything,
/// anonymous visitors only public albums.
pub fn visible_albums(albums: Vec<SharedAlbum>, is_member: bool) -> Vec<SharedAlbum> {
    if is_member {
        albums
    } else {
        albums.into_iter().filter(|a| a.is_public).collect()
    }
}
