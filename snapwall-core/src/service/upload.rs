//! Photo and banner uploads.
//!
//! Bytes are opaque here: clients normalize images to JPEG before upload
//! (an external concern), and the core never inspects the content beyond
//! trusting its declared type.

use bytes::Bytes;
use tracing::info;

use crate::models::{EventId, PhotoId};
use crate::service::{banner_key, photo_key, Admission, AdmissionService, EventMetaService};
use crate::storage::ObjectStore;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct UploadService {
    store: ObjectStore,
    admission: AdmissionService,
    meta: EventMetaService,
}

impl UploadService {
    #[must_use]
    pub const fn new(
        store: ObjectStore,
        admission: AdmissionService,
        meta: EventMetaService,
    ) -> Self {
        Self {
            store,
            admission,
            meta,
        }
    }

    /// Admit and store one photo, returning its new identifier.
    ///
    /// Once admission passes, the write is unconditional — it must never
    /// fail on capacity grounds (see the race note on `AdmissionService`).
    pub async fn upload_photo(&self, event_id: &EventId, data: Bytes) -> Result<PhotoId> {
        if data.is_empty() {
            return Err(Error::InvalidInput("No file provided".to_string()));
        }

        match self.admission.check(event_id).await? {
            Admission::Denied(reason) => Err(Error::AdmissionDenied(reason)),
            Admission::Allowed => {
                let photo_id = PhotoId::new();
                let size = data.len();
                self.store
                    .put(&photo_key(event_id, &photo_id), data, "image/jpeg")
                    .await?;
                info!(
                    event_id = event_id.as_str(),
                    photo_id = photo_id.as_str(),
                    size,
                    "Photo uploaded"
                );
                Ok(photo_id)
            }
        }
    }

    /// Store the event banner and merge its URL into the metadata record.
    ///
    /// Requires the event to exist; banners are a host action, taken after
    /// event creation.
    pub async fn upload_banner(&self, event_id: &EventId, data: Bytes) -> Result<String> {
        let mut meta = self
            .meta
            .get(event_id)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))?;

        if data.is_empty() {
            return Err(Error::InvalidInput("No file provided".to_string()));
        }

        let key = banner_key(event_id);
        self.store.put(&key, data, "image/jpeg").await?;

        let banner_url = self.store.public_url(&key);
        meta.banner_url = Some(banner_url.clone());
        self.meta.save(event_id, &meta).await?;

        info!(event_id = event_id.as_str(), "Banner uploaded");
        Ok(banner_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlbumConfig;
    use crate::models::EventMeta;
    use crate::service::SnapshotService;
    use crate::DenialReason;

    struct Fixture {
        meta: EventMetaService,
        snapshots: SnapshotService,
        uploads: UploadService,
    }

    fn fixture() -> Fixture {
        let store = ObjectStore::memory("https://pub.example.com").expect("store");
        let meta = EventMetaService::new(store.clone());
        let snapshots = SnapshotService::new(store.clone());
        let admission = AdmissionService::new(
            meta.clone(),
            snapshots.clone(),
            &AlbumConfig::default(),
        );
        let uploads = UploadService::new(store, admission, meta.clone());
        Fixture {
            meta,
            snapshots,
            uploads,
        }
    }

    #[tokio::test]
    async fn test_uploaded_photo_appears_in_next_snapshot() {
        let f = fixture();
        let event = f
            .meta
            .create_event(EventMeta::new("e".to_string()))
            .await
            .unwrap();

        let photo_id = f
            .uploads
            .upload_photo(&event, Bytes::from_static(b"jpeg"))
            .await
            .unwrap();

        let snapshot = f.snapshots.snapshot(&event).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].key.contains(photo_id.as_str()));
    }

    #[tokio::test]
    async fn test_empty_photo_body_rejected() {
        let f = fixture();
        let event = f
            .meta
            .create_event(EventMeta::new("e".to_string()))
            .await
            .unwrap();

        let err = f
            .uploads
            .upload_photo(&event, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_upload_denied_at_capacity() {
        let f = fixture();
        let mut meta = EventMeta::new("e".to_string());
        meta.max_photos = Some(1);
        let event = f.meta.create_event(meta).await.unwrap();

        f.uploads
            .upload_photo(&event, Bytes::from_static(b"one"))
            .await
            .unwrap();
        let err = f
            .uploads
            .upload_photo(&event, Bytes::from_static(b"two"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::AdmissionDenied(DenialReason::CapacityReached)
        ));
    }

    #[tokio::test]
    async fn test_banner_requires_existing_event() {
        let f = fixture();
        let event = EventId::from_string("ev12345678".to_string());
        let err = f
            .uploads
            .upload_banner(&event, Bytes::from_static(b"jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_banner_merges_url_into_meta() {
        let f = fixture();
        let event = f
            .meta
            .create_event(EventMeta::new("e".to_string()))
            .await
            .unwrap();

        let url = f
            .uploads
            .upload_banner(&event, Bytes::from_static(b"jpeg"))
            .await
            .unwrap();
        assert_eq!(
            url,
            format!("https://pub.example.com/banners/{event}.jpg")
        );

        let meta = f.meta.get(&event).await.unwrap().expect("meta");
        assert_eq!(meta.banner_url.as_deref(), Some(url.as_str()));
        assert_eq!(meta.name, "e");
    }
}
