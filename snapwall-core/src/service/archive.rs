//! Zip packaging for the album download.

use std::io::{Cursor, Write};
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::models::EventId;
use crate::service::{EventMetaService, SnapshotService};
use crate::storage::ObjectStore;
use crate::{Error, Result};

/// Characters allowed in the download filename.
static FILENAME_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9-_ ]").expect("Invalid filename regex"));

#[derive(Debug, Clone)]
pub struct ArchiveService {
    store: ObjectStore,
    snapshots: SnapshotService,
    meta: EventMetaService,
}

impl ArchiveService {
    #[must_use]
    pub const fn new(
        store: ObjectStore,
        snapshots: SnapshotService,
        meta: EventMetaService,
    ) -> Self {
        Self {
            store,
            snapshots,
            meta,
        }
    }

    /// Package all current photos of an event into a zip archive.
    ///
    /// Returns the suggested download filename and the archive bytes.
    /// `NotFound` when the event has no photos.
    pub async fn build_zip(&self, event_id: &EventId) -> Result<(String, Vec<u8>)> {
        let (meta, snapshot) = tokio::try_join!(
            self.meta.get(event_id),
            self.snapshots.snapshot(event_id)
        )?;

        if snapshot.is_empty() {
            return Err(Error::NotFound(
                "No photos found for this event".to_string(),
            ));
        }

        let event_name = meta.map_or_else(|| event_id.to_string(), |m| m.name);
        let filename = format!("{}-photos.zip", sanitize_filename(&event_name, event_id));

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut packed = 0usize;
        for photo in &snapshot {
            let bytes = match self.store.get(&photo.key).await {
                Ok(bytes) => bytes,
                // Listed but deleted since the snapshot: skip it.
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            packed += 1;
            zip.start_file(format!("photo-{packed}.jpg"), options)
                .map_err(|e| Error::Internal(format!("Zip write failed: {e}")))?;
            zip.write_all(&bytes)
                .map_err(|e| Error::Internal(format!("Zip write failed: {e}")))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Internal(format!("Zip finish failed: {e}")))?;

        info!(
            event_id = event_id.as_str(),
            photos = packed,
            "Album archive built"
        );
        Ok((filename, cursor.into_inner()))
    }
}

fn sanitize_filename(name: &str, event_id: &EventId) -> String {
    let safe = FILENAME_SAFE.replace_all(name, "").trim().to_string();
    if safe.is_empty() {
        event_id.to_string()
    } else {
        safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventMeta;
    use bytes::Bytes;

    struct Fixture {
        meta: EventMetaService,
        archive: ArchiveService,
        store: ObjectStore,
    }

    fn fixture() -> Fixture {
        let store = ObjectStore::memory("https://pub.example.com").expect("store");
        let meta = EventMetaService::new(store.clone());
        let snapshots = SnapshotService::new(store.clone());
        let archive = ArchiveService::new(store.clone(), snapshots, meta.clone());
        Fixture {
            meta,
            archive,
            store,
        }
    }

    #[test]
    fn test_sanitize_filename() {
        let event = EventId::from_string("ev12345678".to_string());
        assert_eq!(sanitize_filename("My Party", &event), "My Party");
        assert_eq!(sanitize_filename("fête/2026!", &event), "fte2026");
        assert_eq!(sanitize_filename("///", &event), "ev12345678");
    }

    #[tokio::test]
    async fn test_zip_contains_all_photos() {
        let f = fixture();
        let event = f
            .meta
            .create_event(EventMeta::new("My Party".to_string()))
            .await
            .unwrap();
        for name in ["a", "b"] {
            f.store
                .put(
                    &format!("events/{event}/{name}.jpg"),
                    Bytes::from_static(b"jpeg-bytes"),
                    "image/jpeg",
                )
                .await
                .unwrap();
        }

        let (filename, bytes) = f.archive.build_zip(&event).await.unwrap();
        assert_eq!(filename, "My Party-photos.zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["photo-1.jpg", "photo-2.jpg"]);
    }

    #[tokio::test]
    async fn test_empty_event_is_not_found() {
        let f = fixture();
        let event = f
            .meta
            .create_event(EventMeta::new("Empty".to_string()))
            .await
            .unwrap();

        let err = f.archive.build_zip(&event).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_meta_falls_back_to_event_id() {
        let f = fixture();
        let event = EventId::from_string("ev12345678".to_string());
        f.store
            .put(
                &format!("events/{event}/a.jpg"),
                Bytes::from_static(b"jpeg"),
                "image/jpeg",
            )
            .await
            .unwrap();

        let (filename, _bytes) = f.archive.build_zip(&event).await.unwrap();
        assert_eq!(filename, "ev12345678-photos.zip");
    }
}
