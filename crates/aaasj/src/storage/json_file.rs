//! JSON file repository implementation.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use aaasj_core::albums::SharedAlbum;
use aaasj_core::events::{new_events_by_title_and_date, EventItem, ImportSummary};
use aaasj_core::storage::{AlbumRepository, EventRepository, RepositoryError, Result};

/// A record kept in a JSON array file.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> &str;
}

impl Record for EventItem {
    const ENTITY_TYPE: &'static str = "Event";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SharedAlbum {
    const ENTITY_TYPE: &'static str = "SharedAlbum";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A list of records persisted as one pretty-printed JSON array.
///
/// Read-modify-write cycles are serialized by an async mutex and every write
/// replaces the file through a rename, so readers never see a partial file.
/// A missing file reads as an empty list; so does a file that does not
/// parse, which is logged and overwritten by the next write.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in file order.
    pub async fn load(&self) -> Result<Vec<T>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::Io(e.to_string())),
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Store file is not a valid record list, treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| RepositoryError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| RepositoryError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepositoryError::Io(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Store saved");
        Ok(())
    }

    /// Runs `f` on the current records and saves the result if it succeeds.
    async fn modify<R>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R>) -> Result<R> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let out = f(&mut records)?;
        self.save(&records).await?;
        Ok(out)
    }

    async fn find(&self, id: &str) -> Result<Option<T>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    async fn insert(&self, record: &T) -> Result<()> {
        self.modify(|records| {
            if records.iter().any(|r| r.id() == record.id()) {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: T::ENTITY_TYPE,
                    id: record.id().to_string(),
                });
            }
            records.push(record.clone());
            Ok(())
        })
        .await
    }

    async fn replace(&self, record: &T) -> Result<()> {
        self.modify(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id() == record.id())
                .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, record.id()))?;
            *slot = record.clone();
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.modify(|records| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            if records.len() == before {
                return Err(RepositoryError::not_found(T::ENTITY_TYPE, id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl EventRepository for JsonFileStore<EventItem> {
    async fn list_events(&self) -> Result<Vec<EventItem>> {
        self.load().await
    }

    async fn get_event(&self, id: &str) -> Result<Option<EventItem>> {
        self.find(id).await
    }

    async fn create_event(&self, event: &EventItem) -> Result<()> {
        self.insert(event).await
    }

    async fn update_event(&self, event: &EventItem) -> Result<()> {
        self.replace(event).await
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        self.remove(id).await
    }

    async fn import_events(&self, incoming: &[EventItem]) -> Result<ImportSummary> {
        self.modify(|events| {
            let added = new_events_by_title_and_date(events, incoming);
            let summary = ImportSummary {
                added: added.len(),
                total: events.len() + added.len(),
            };
            events.extend(added);
            Ok(summary)
        })
        .await
    }
}

#[async_trait]
impl AlbumRepository for JsonFileStore<SharedAlbum> {
    async fn list_albums(&self) -> Result<Vec<SharedAlbum>> {
        self.load().await
    }

    async fn get_album(&self, id: &str) -> Result<Option<SharedAlbum>> {
        self.find(id).await
    }

    async fn create_album(&self, album: &SharedAlbum) -> Result<()> {
        self.insert(album).await
    }

    async fn update_album(&self, album: &SharedAlbum) -> Result<()> {
        self.replace(album).await
    }

    async fn delete_album(&self, id: &str) -> Result<()> {
        self.remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aaasj_core::events::EventStatus;
    use tempfile::TempDir;

    use super::*;

    fn event_store(dir: &TempDir) -> JsonFileStore<EventItem> {
        JsonFileStore::new(dir.path().join("data").join("events.json"))
    }

    fn album(id: &str) -> SharedAlbum {
        SharedAlbum {
            id: id.to_string(),
            title: format!("Album {id}"),
            share_url: format!("https://photos.app.goo.gl/{id}"),
            description: None,
            is_public: true,
            photos: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = event_store(&dir);

        assert!(store.list_events().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store: JsonFileStore<EventItem> = JsonFileStore::new(&path);

        assert!(store.list_events().await.unwrap().is_empty());

        store
            .create_event(&EventItem::new("e1", "Picnic", "2025-06-01"))
            .await
            .unwrap();
        assert_eq!(store.list_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_writes_pretty_camel_case_json() {
        let dir = TempDir::new().unwrap();
        let store = event_store(&dir);
        let mut event = EventItem::new("e1", "Gala", "2025-10-04");
        event.registration_disabled = Some(true);

        store.create_event(&event).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": \"e1\""));
        assert!(raw.contains("\"registrationDisabled\": true"));
        assert!(!raw.contains("\"location\""));
        assert!(!dir.path().join("data").join("events.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_create_duplicate_id_fails() {
        let dir = TempDir::new().unwrap();
        let store = event_store(&dir);
        let event = EventItem::new("e1", "Gala", "2025-10-04");

        store.create_event(&event).await.unwrap();
        let err = store.create_event(&event).await.unwrap_err();

        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete_by_id() {
        let dir = TempDir::new().unwrap();
        let store = event_store(&dir);
        store
            .create_event(&EventItem::new("e1", "Gala", "2025-10-04"))
            .await
            .unwrap();

        let updated = EventItem::new("e1", "Gala Night", "2025-10-04").with_status(EventStatus::Past);
        store.update_event(&updated).await.unwrap();
        assert_eq!(store.get_event("e1").await.unwrap(), Some(updated));

        store.delete_event("e1").await.unwrap();
        assert_eq!(store.get_event("e1").await.unwrap(), None);

        let err = store.delete_event("e1").await.unwrap_err();
        assert_eq!(err, RepositoryError::not_found("Event", "e1"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = event_store(&dir);

        let err = store
            .update_event(&EventItem::new("ghost", "T", "2025-01-01"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_import_skips_existing_title_and_date() {
        let dir = TempDir::new().unwrap();
        let store = event_store(&dir);
        store
            .create_event(&EventItem::new("mine", "Gala", "2025-10-04"))
            .await
            .unwrap();

        let incoming = vec![
            EventItem::new("static-1", "Gala", "2025-10-04"),
            EventItem::new("static-2", "Picnic", "2025-06-01"),
        ];

        let summary = store.import_events(&incoming).await.unwrap();
        assert_eq!(summary, ImportSummary { added: 1, total: 2 });

        let summary = store.import_events(&incoming).await.unwrap();
        assert_eq!(summary, ImportSummary { added: 0, total: 2 });
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let store: Arc<JsonFileStore<SharedAlbum>> =
            Arc::new(JsonFileStore::new(dir.path().join("shared-albums.json")));

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create_album(&album(&i.to_string())).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.list_albums().await.unwrap().len(), 10);
    }
}
