use async_trait::async_trait;

use crate::albums::SharedAlbum;
use crate::events::{EventItem, ImportSummary};

use super::Result;

/// Repository for event records.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Returns every stored event in storage order.
    async fn list_events(&self) -> Result<Vec<EventItem>>;

    /// Gets an event by its ID.
    async fn get_event(&self, id: &str) -> Result<Option<EventItem>>;

    /// Appends a new event.
    async fn create_event(&self, event: &EventItem) -> Result<()>;

    /// Replaces the event with the matching ID.
    async fn update_event(&self, event: &EventItem) -> Result<()>;

    /// Deletes the event with the matching ID.
    async fn delete_event(&self, id: &str) -> Result<()>;

    /// Appends the events whose `title|date` key is not stored yet.
    async fn import_events(&self, incoming: &[EventItem]) -> Result<ImportSummary>;
}

/// Repository for shared album records.
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Returns every stored album in storage order.
    async fn list_albums(&self) -> Result<Vec<SharedAlbum>>;

    /// Gets an album by its ID.
    async fn get_album(&self, id: &str) -> Result<Option<SharedAlbum>>;

    /// Appends a new album.
    async fn create_album(&self, album: &SharedAlbum) -> Result<()>;

    /// Replaces the album with the matching ID.
    async fn update_album(&self, album: &SharedAlbum) -> Result<()>;

    /// Deletes the album with the matching ID.
    async fn delete_album(&self, id: &str) -> Result<()>;
}
