//! Event metadata access.
//!
//! Metadata lives as one small JSON object per event in the store. It is
//! fetched fresh for every operation and written back whole; merge
//! semantics are read-modify-write by callers, last writer wins.

use bytes::Bytes;
use tracing::info;

use crate::models::{EventId, EventMeta};
use crate::service::meta_key;
use crate::storage::ObjectStore;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct EventMetaService {
    store: ObjectStore,
}

impl EventMetaService {
    #[must_use]
    pub const fn new(store: ObjectStore) -> Self {
        Self { store }
    }

    /// Fetch an event's metadata; `None` when the event was never created.
    pub async fn get(&self, event_id: &EventId) -> Result<Option<EventMeta>> {
        match self.store.get(&meta_key(event_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write an event's metadata record whole.
    pub async fn save(&self, event_id: &EventId, meta: &EventMeta) -> Result<()> {
        let bytes = Bytes::from(serde_json::to_vec(meta)?);
        self.store
            .put(&meta_key(event_id), bytes, "application/json")
            .await
    }

    /// Create a new event with a fresh identifier.
    pub async fn create_event(&self, meta: EventMeta) -> Result<EventId> {
        let event_id = EventId::new();
        self.save(&event_id, &meta).await?;
        info!(event_id = event_id.as_str(), name = %meta.name, "Event created");
        Ok(event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EventMetaService {
        EventMetaService::new(ObjectStore::memory("https://pub.example.com").expect("store"))
    }

    #[tokio::test]
    async fn test_get_missing_meta_is_none() {
        let service = service();
        let event = EventId::from_string("ev12345678".to_string());
        assert!(service.get(&event).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let mut meta = EventMeta::new("Wedding".to_string());
        meta.max_photos = Some(12);

        let event_id = service.create_event(meta.clone()).await.unwrap();
        assert_eq!(event_id.as_str().len(), 10);

        let fetched = service.get(&event_id).await.unwrap().expect("meta");
        assert_eq!(fetched, meta);
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_record() {
        let service = service();
        let event_id = service
            .create_event(EventMeta::new("Before".to_string()))
            .await
            .unwrap();

        let mut updated = service.get(&event_id).await.unwrap().expect("meta");
        updated.banner_url = Some("https://pub.example.com/banners/x.jpg".to_string());
        service.save(&event_id, &updated).await.unwrap();

        let fetched = service.get(&event_id).await.unwrap().expect("meta");
        assert_eq!(fetched, updated);
    }
}
